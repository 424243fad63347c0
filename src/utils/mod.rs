pub mod helper;
pub mod running_sum;
