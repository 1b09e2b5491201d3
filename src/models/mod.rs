pub mod attendance;
pub mod course;
pub mod coursework;
pub mod roster;

pub use attendance::{
    AttendanceMark, AttendanceOverall, AttendanceRecord, AttendanceStats, SaveAttendanceRequest,
    StudentAttendance, User,
};
pub use course::{Course, CourseRole, UserCourseRole};
pub use coursework::{
    Announcement, CourseWork, HistoryEntry, PartialDate, StateHistory, Submission, TimeOfDay,
};
pub use roster::{PersonName, Student, Teacher, UserProfile};
