pub mod db;
pub mod drug_order;
pub mod errors;
pub mod order_group;
pub mod order_set;
pub mod order_set_member;

#[cfg(test)]
mod tests;
