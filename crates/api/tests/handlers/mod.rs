mod availability_test;
mod config_test;
