use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::filter::FilterCommit;
use crate::domain::entities::geo::GeoDataSource;
use crate::usecase::services::session::PanelSession;

pub struct PanelState {
    pub geo: Signal<GeoDataSource>,
    pub session: Signal<PanelSession>,
    pub show_filters: Signal<bool>,
    pub committed: Signal<Option<FilterCommit>>,
    pub sidebar_collapsed: Signal<bool>,
    pub open_submenu: Signal<Option<&'static str>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            geo: use_signal(GeoDataSource::default),
            session: use_signal(PanelSession::closed),
            show_filters: use_signal(|| false),
            committed: use_signal(|| None::<FilterCommit>),
            sidebar_collapsed: use_signal(|| false),
            open_submenu: use_signal(|| None::<&'static str>),
            busy: use_signal(|| false),
            status: use_signal(|| "ready".to_string()),
        }
    }
}
