pub mod health;
pub mod issues;
pub mod test_report;
