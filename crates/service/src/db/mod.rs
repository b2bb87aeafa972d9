pub mod order_group_service;
pub mod order_set_service;
