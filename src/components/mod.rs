//! UI Components

mod auth_button;
mod chat_widget;
mod todo_form;
mod todo_list;

pub use auth_button::AuthButton;
pub use chat_widget::ChatWidget;
pub use todo_form::TodoForm;
pub use todo_list::TodoList;
