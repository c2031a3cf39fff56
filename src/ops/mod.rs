pub mod inline_edit;
pub mod memo_ops;
pub mod todo_ops;
