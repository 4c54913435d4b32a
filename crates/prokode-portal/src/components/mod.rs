pub(crate) mod fatal_error;
pub(crate) mod login_panel;

pub(crate) use fatal_error::FatalErrorPage;
pub(crate) use login_panel::LoginPanel;
