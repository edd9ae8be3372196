pub mod availabilities;
pub mod home;
pub mod schedules;
