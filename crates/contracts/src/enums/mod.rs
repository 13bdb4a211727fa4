pub mod marketplace_type;
pub mod queue_status;
pub mod report_status;
pub mod report_type;
pub mod subscription_status;
