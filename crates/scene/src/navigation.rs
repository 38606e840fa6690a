use foundation::HotspotId;
use foundation::math::GeoPoint;
use tracing::debug;

/// Versioned camera instruction.
///
/// Consumers must key off `request_id`, never `target_id`: asking for the
/// same target twice yields two distinct requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationRequest {
    pub request_id: u64,
    pub target_id: Option<HotspotId>,
    /// Coordinate supplied by the caller (e.g. a map click), if any.
    pub target_hint: Option<GeoPoint>,
}

/// Scan-mode position within the ranked list.
///
/// When `ranked_ids` is non-empty, `index < ranked_ids.len()` always holds.
/// With an empty list the index is meaningless and left at whatever it was.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanState {
    pub enabled: bool,
    pub index: usize,
    pub ranked_ids: Vec<HotspotId>,
}

impl ScanState {
    pub fn current_id(&self) -> Option<&HotspotId> {
        self.ranked_ids.get(self.index)
    }

    /// "3/12"-style position for the scan control.
    pub fn indicator(&self) -> String {
        format!("{}/{}", self.index + 1, self.ranked_ids.len())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavigationPhase {
    /// Scan off, nothing selected.
    Idle,
    /// Something selected outside of scan mode, e.g. from a map click.
    Previewing,
    Scanning,
}

/// Result of a navigation transition.
///
/// Non-fatal anomalies are reported here instead of as errors; the state
/// machine never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A new camera request was issued.
    Navigated(NavigationRequest),
    /// The target is not in the ranked list. The request was still issued but
    /// the scan index was left where it was.
    StaleIdLookup(NavigationRequest),
    /// `next`/`prev` with nothing to step through; nothing changed.
    EmptyRankedList,
    /// State changed without moving the camera.
    Unchanged,
}

impl Transition {
    pub fn request(&self) -> Option<&NavigationRequest> {
        match self {
            Transition::Navigated(req) | Transition::StaleIdLookup(req) => Some(req),
            Transition::EmptyRankedList | Transition::Unchanged => None,
        }
    }
}

/// Scan and selection state machine.
///
/// Owns the scan cursor, the current selection, the preview flag and the
/// navigation request counter. Every transition that should move the camera
/// bumps `request_id` by exactly one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Navigator {
    scan: ScanState,
    selected_id: Option<HotspotId>,
    preview_open: bool,
    request: NavigationRequest,
}

impl Navigator {
    pub fn new(ranked_ids: Vec<HotspotId>) -> Self {
        Self {
            scan: ScanState {
                enabled: false,
                index: 0,
                ranked_ids,
            },
            ..Self::default()
        }
    }

    pub fn scan(&self) -> &ScanState {
        &self.scan
    }

    pub fn selected_id(&self) -> Option<&HotspotId> {
        self.selected_id.as_ref()
    }

    pub fn is_preview_open(&self) -> bool {
        self.preview_open
    }

    pub fn request(&self) -> &NavigationRequest {
        &self.request
    }

    pub fn phase(&self) -> NavigationPhase {
        if self.scan.enabled {
            NavigationPhase::Scanning
        } else if self.selected_id.is_some() {
            NavigationPhase::Previewing
        } else {
            NavigationPhase::Idle
        }
    }

    /// Selects `id` (or clears the selection with `None`).
    ///
    /// Selecting turns scan mode on and opens the preview. If `id` is not in
    /// the ranked list the previous index is kept.
    pub fn select_hotspot(
        &mut self,
        id: Option<HotspotId>,
        target_hint: Option<GeoPoint>,
    ) -> Transition {
        let Some(id) = id else {
            self.selected_id = None;
            self.preview_open = false;
            return Transition::Navigated(self.issue(None, None));
        };

        let found = self.position_of(&id);
        if let Some(index) = found {
            self.scan.index = index;
        }
        self.scan.enabled = true;
        self.preview_open = true;
        self.selected_id = Some(id.clone());

        let req = self.issue(Some(id), target_hint);
        match found {
            Some(_) => Transition::Navigated(req),
            None => {
                debug!(target_id = ?req.target_id, "selected hotspot is not in the ranked list");
                Transition::StaleIdLookup(req)
            }
        }
    }

    /// Flips scan mode. Enabling jumps to the top of the ranked list;
    /// disabling leaves the selection alone and does not move the camera.
    pub fn toggle_scan(&mut self) -> Transition {
        self.scan.enabled = !self.scan.enabled;
        if !self.scan.enabled {
            return Transition::Unchanged;
        }

        self.scan.index = 0;
        let top = self.scan.ranked_ids.first().cloned();
        self.preview_open = top.is_some();
        self.selected_id = top.clone();
        Transition::Navigated(self.issue(top, None))
    }

    pub fn next(&mut self) -> Transition {
        let len = self.scan.ranked_ids.len();
        if len == 0 {
            debug!("next requested with an empty ranked list");
            return Transition::EmptyRankedList;
        }
        self.step_to((self.scan.index + 1) % len)
    }

    pub fn prev(&mut self) -> Transition {
        let len = self.scan.ranked_ids.len();
        if len == 0 {
            debug!("prev requested with an empty ranked list");
            return Transition::EmptyRankedList;
        }
        self.step_to((self.scan.index + len - 1) % len)
    }

    pub fn exit_scan(&mut self) -> Transition {
        self.scan.enabled = false;
        self.selected_id = None;
        self.preview_open = false;
        Transition::Navigated(self.issue(None, None))
    }

    /// Selects `id` directly. Scan state only follows when `id` is ranked.
    pub fn jump_to(&mut self, id: HotspotId) -> Transition {
        let found = self.position_of(&id);
        if let Some(index) = found {
            self.scan.index = index;
            self.scan.enabled = true;
        }
        self.selected_id = Some(id.clone());
        self.preview_open = true;

        let req = self.issue(Some(id), None);
        match found {
            Some(_) => Transition::Navigated(req),
            None => {
                debug!(target_id = ?req.target_id, "jump target is not in the ranked list");
                Transition::StaleIdLookup(req)
            }
        }
    }

    /// Installs a freshly computed ranked order and rewinds the scan index.
    ///
    /// `enabled` and the selection are kept as they are; the selected id is
    /// not searched for in the new order.
    pub fn refresh(&mut self, ranked_ids: Vec<HotspotId>) {
        self.scan.ranked_ids = ranked_ids;
        self.scan.index = 0;
    }

    fn step_to(&mut self, index: usize) -> Transition {
        self.scan.index = index;
        let id = self.scan.ranked_ids[index].clone();
        self.selected_id = Some(id.clone());
        self.preview_open = true;
        Transition::Navigated(self.issue(Some(id), None))
    }

    fn position_of(&self, id: &HotspotId) -> Option<usize> {
        self.scan.ranked_ids.iter().position(|r| r == id)
    }

    fn issue(&mut self, target_id: Option<HotspotId>, target_hint: Option<GeoPoint>) -> NavigationRequest {
        self.request = NavigationRequest {
            request_id: self.request.request_id + 1,
            target_id,
            target_hint,
        };
        debug!(
            request_id = self.request.request_id,
            target_id = ?self.request.target_id,
            "navigation requested"
        );
        self.request.clone()
    }
}

/// Camera-side guard that handles each navigation request exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    last_handled: u64,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_handled(&self) -> u64 {
        self.last_handled
    }

    /// Returns `request` if its id has not been handled yet and marks it
    /// handled.
    pub fn take<'a>(&mut self, request: &'a NavigationRequest) -> Option<&'a NavigationRequest> {
        if request.request_id <= self.last_handled {
            return None;
        }
        self.last_handled = request.request_id;
        Some(request)
    }
}
