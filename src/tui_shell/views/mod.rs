pub(super) mod duplicates;
pub(super) mod organization;

pub(in crate::tui_shell) use duplicates::DuplicatesView;
pub(in crate::tui_shell) use organization::OrganizationView;
