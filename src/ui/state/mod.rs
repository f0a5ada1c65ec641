pub mod panel_state;
