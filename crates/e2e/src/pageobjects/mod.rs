//! Page objects, one per UI surface of the IDE and dashboard

pub mod dashboard;
pub mod dialog_window;
pub mod editor;
pub mod ide;
pub mod notification;
pub mod project_tree;
pub mod quick_open;
pub mod terminal;
pub mod top_menu;

pub use dashboard::Dashboard;
pub use dialog_window::DialogWindow;
pub use editor::Editor;
pub use ide::Ide;
pub use notification::Notification;
pub use project_tree::ProjectTree;
pub use quick_open::QuickOpenContainer;
pub use terminal::Terminal;
pub use top_menu::TopMenu;
