pub mod filter;
pub mod order;
pub mod subtask_view;
