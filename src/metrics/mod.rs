pub mod calculator;
pub mod calendar;
pub mod clock;
pub mod late_remark;
pub mod punch;
