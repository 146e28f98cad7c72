//! Core data models and the view state store.
//! Wire names follow the pins backend (`_id`, `desc`, `lat`, `lng`, `createdAt`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::rc::Rc;
use std::str::FromStr;
use yew::Reducible;

use crate::error::{AppError, Result};
use crate::state::Viewport;

/// Star rating, always within 1..=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(AppError::InvalidRating(value.to_string()))
        }
    }

    /// Pulls legacy out-of-range values (e.g. a stored 0) into range.
    pub fn saturating(value: i64) -> Self {
        Rating(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(Self::MIN)
    }
}

impl FromStr for Rating {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let v: i64 = s
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidRating(s.to_string()))?;
        Rating::new(v)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Older records stored the selector value as a string.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }
        let n = match Raw::deserialize(deserializer)? {
            Raw::Num(n) => n,
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid rating {s:?}")))?,
        };
        if !n.is_finite() {
            return Err(serde::de::Error::custom("invalid rating"));
        }
        Ok(Rating::saturating(n.round() as i64))
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// A reviewed place as returned by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "desc", default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub rating: Rating,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// `POST /pins` body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPin {
    pub username: String,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub rating: Rating,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

/// An uncommitted pin being composed in the draft popup.
#[derive(Clone, Debug, PartialEq)]
pub struct DraftPin {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub description: String,
    pub rating: Rating,
    /// A create request is in flight; the submit button is disabled meanwhile.
    pub submitting: bool,
}

impl DraftPin {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            title: String::new(),
            description: String::new(),
            rating: Rating::default(),
            submitting: false,
        }
    }

    pub fn to_new_pin(&self, username: Option<&str>) -> Result<NewPin> {
        let username = username.ok_or(AppError::NotLoggedIn)?;
        Ok(NewPin {
            username: username.to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            rating: self.rating,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// The single overlay shown above the map. Only one can be open at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Overlay {
    #[default]
    None,
    Viewing(String),
    Drafting(DraftPin),
    Login,
    Register,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapState {
    pub viewport: Viewport,
    pub pins: Vec<Pin>,
    pub user: Option<String>,
    pub overlay: Overlay,
    pub error: Option<AppError>,
    /// Bumped on every transition so effects can key on it.
    pub version: u64,
}

impl MapState {
    pub fn new(user: Option<String>) -> Self {
        Self {
            viewport: Viewport::default(),
            pins: Vec::new(),
            user,
            overlay: Overlay::None,
            error: None,
            version: 0,
        }
    }

    pub fn selected_pin(&self) -> Option<&Pin> {
        match &self.overlay {
            Overlay::Viewing(id) => self.pins.iter().find(|p| &p.id == id),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&DraftPin> {
        match &self.overlay {
            Overlay::Drafting(d) => Some(d),
            _ => None,
        }
    }

    /// Author styling applies only to the logged-in user's own pins.
    pub fn is_own(&self, pin: &Pin) -> bool {
        self.user.as_deref() == Some(pin.username.as_str())
    }

    /// Topmost marker under a screen point. Later pins draw above earlier ones.
    pub fn pin_at(&self, sx: f64, sy: f64) -> Option<&Pin> {
        self.pins
            .iter()
            .rev()
            .find(|p| self.viewport.marker_contains(p.latitude, p.longitude, sx, sy))
    }

    /// Coordinate a double-click at a screen point drafts a pin at, if any.
    /// Nothing is drafted when logged out, over a marker, or when the click
    /// sequence began on a marker (`marker_clicked`).
    pub fn draft_target(&self, sx: f64, sy: f64, marker_clicked: bool) -> Option<(f64, f64)> {
        if marker_clicked || self.user.is_none() || self.pin_at(sx, sy).is_some() {
            return None;
        }
        Some(self.viewport.from_screen(sx, sy))
    }
}

#[derive(Clone, Debug)]
pub enum MapAction {
    Resize { width: f64, height: f64 },
    Pan { dx: f64, dy: f64 },
    ZoomAt { x: f64, y: f64, factor: f64 },
    ZoomBy(f64),
    ResetView,
    PinsLoaded(Vec<Pin>),
    SelectPin(String),
    OpenDraft { latitude: f64, longitude: f64 },
    EditTitle(String),
    EditDescription(String),
    EditRating(Rating),
    SubmitStarted,
    PinCreated(Pin),
    SubmitFailed(AppError),
    ClosePopup,
    ShowLogin,
    ShowRegister,
    LoggedIn(String),
    LoggedOut,
    Failed(AppError),
    DismissError,
}

impl Reducible for MapState {
    type Action = MapAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use MapAction::*;
        let mut new = (*self).clone();
        match action {
            Resize { width, height } => new.viewport.resize(width, height),
            Pan { dx, dy } => new.viewport.pan(dx, dy),
            ZoomAt { x, y, factor } => new.viewport.zoom_at(x, y, factor),
            ZoomBy(delta) => new.viewport.zoom_by(delta),
            ResetView => {
                let d = Viewport::default();
                new.viewport.recenter(d.latitude, d.longitude);
                new.viewport.zoom = d.zoom;
            }
            PinsLoaded(pins) => new.pins = pins,
            SelectPin(id) => {
                let Some(pin) = new.pins.iter().find(|p| p.id == id) else {
                    return self;
                };
                let (lat, lng) = (pin.latitude, pin.longitude);
                new.viewport.recenter(lat, lng);
                new.overlay = Overlay::Viewing(id);
            }
            OpenDraft { latitude, longitude } => {
                if new.user.is_none() {
                    return self;
                }
                new.overlay = Overlay::Drafting(DraftPin::at(latitude, longitude));
            }
            EditTitle(v) => match &mut new.overlay {
                Overlay::Drafting(d) => d.title = v,
                _ => return self,
            },
            EditDescription(v) => match &mut new.overlay {
                Overlay::Drafting(d) => d.description = v,
                _ => return self,
            },
            EditRating(r) => match &mut new.overlay {
                Overlay::Drafting(d) => d.rating = r,
                _ => return self,
            },
            SubmitStarted => match &mut new.overlay {
                Overlay::Drafting(d) => d.submitting = true,
                _ => return self,
            },
            PinCreated(pin) => {
                if !new.pins.iter().any(|p| p.id == pin.id) {
                    new.pins.push(pin);
                }
                // A draft opened after the submit keeps its input
                if matches!(&new.overlay, Overlay::Drafting(d) if d.submitting) {
                    new.overlay = Overlay::None;
                }
            }
            SubmitFailed(err) => {
                if let Overlay::Drafting(d) = &mut new.overlay {
                    d.submitting = false;
                }
                new.error = Some(err);
            }
            ClosePopup => new.overlay = Overlay::None,
            ShowLogin => {
                if new.user.is_some() {
                    return self;
                }
                new.overlay = Overlay::Login;
            }
            ShowRegister => {
                if new.user.is_some() {
                    return self;
                }
                new.overlay = Overlay::Register;
            }
            LoggedIn(username) => {
                new.user = Some(username);
                new.overlay = Overlay::None;
            }
            LoggedOut => {
                new.user = None;
                if matches!(
                    new.overlay,
                    Overlay::Drafting(_) | Overlay::Login | Overlay::Register
                ) {
                    new.overlay = Overlay::None;
                }
            }
            Failed(err) => new.error = Some(err),
            DismissError => new.error = None,
        }
        new.version = self.version.wrapping_add(1);
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DragState;

    fn pin(id: &str, username: &str, lat: f64, lng: f64) -> Pin {
        Pin {
            id: id.into(),
            username: username.into(),
            title: format!("title {id}"),
            description: String::new(),
            rating: Rating::default(),
            latitude: lat,
            longitude: lng,
            created_at: None,
        }
    }

    fn apply(state: MapState, actions: Vec<MapAction>) -> Rc<MapState> {
        actions
            .into_iter()
            .fold(Rc::new(state), |s, a| s.reduce(a))
    }

    #[test]
    fn rating_parses_only_one_to_five() {
        assert_eq!("4".parse::<Rating>().unwrap().get(), 4);
        assert_eq!(" 1 ".parse::<Rating>().unwrap().get(), 1);
        assert_eq!(
            "0".parse::<Rating>(),
            Err(AppError::InvalidRating("0".into()))
        );
        assert!("6".parse::<Rating>().is_err());
        assert!("four".parse::<Rating>().is_err());
        assert_eq!(Rating::all().count(), 5);
    }

    #[test]
    fn pin_decodes_server_record() {
        let raw = r#"[
            {"_id":"a1","username":"bob","title":"Tower","desc":"Tall","rating":5,
             "lat":35.6,"lng":139.7,"createdAt":"2021-08-30T10:00:00.000Z","__v":0},
            {"_id":"a2","username":"eve","title":null,"rating":"3","lat":1.0,"lng":2.0},
            {"_id":"a3","username":"eve","title":"Old","desc":"x","rating":0,"lat":1.0,"lng":2.0}
        ]"#;
        let pins: Vec<Pin> = serde_json::from_str(raw).unwrap();
        assert_eq!(pins.len(), 3);
        assert_eq!(pins[0].description, "Tall");
        assert_eq!(pins[0].rating.get(), 5);
        assert_eq!(pins[0].created_at.as_deref(), Some("2021-08-30T10:00:00.000Z"));
        assert_eq!(pins[1].title, "");
        assert_eq!(pins[1].rating.get(), 3);
        assert_eq!(pins[2].rating.get(), 1);
    }

    #[test]
    fn pin_with_garbage_rating_is_rejected() {
        let raw = r#"{"_id":"a","username":"u","rating":"lots","lat":0,"lng":0}"#;
        assert!(serde_json::from_str::<Pin>(raw).is_err());
    }

    #[test]
    fn loaded_pins_replace_list() {
        let s = apply(
            MapState::new(None),
            vec![MapAction::PinsLoaded(vec![
                pin("1", "a", 0.0, 0.0),
                pin("2", "b", 1.0, 1.0),
                pin("3", "c", 2.0, 2.0),
            ])],
        );
        assert_eq!(s.pins.len(), 3);
        let s = s.reduce(MapAction::PinsLoaded(vec![pin("9", "a", 0.0, 0.0)]));
        assert_eq!(s.pins.len(), 1);
    }

    #[test]
    fn selecting_marker_opens_one_popup_and_recenters() {
        let s = apply(
            MapState::new(None),
            vec![
                MapAction::PinsLoaded(vec![pin("1", "a", 10.0, 20.0), pin("2", "b", -5.0, 100.0)]),
                MapAction::SelectPin("2".into()),
            ],
        );
        assert_eq!(s.overlay, Overlay::Viewing("2".into()));
        assert_eq!(s.selected_pin().map(|p| p.id.as_str()), Some("2"));
        assert!((s.viewport.latitude + 5.0).abs() < 1e-9);
        assert!((s.viewport.longitude - 100.0).abs() < 1e-9);

        let s = s.reduce(MapAction::SelectPin("1".into()));
        assert_eq!(s.selected_pin().map(|p| p.id.as_str()), Some("1"));

        let before = s.version;
        let s = s.reduce(MapAction::SelectPin("missing".into()));
        assert_eq!(s.version, before);
    }

    #[test]
    fn marker_click_hits_topmost_pin() {
        let s = apply(
            MapState::new(None),
            vec![MapAction::PinsLoaded(vec![
                pin("under", "a", 35.0, 139.0),
                pin("over", "b", 35.0, 139.0),
            ])],
        );
        let (x, y) = s.viewport.to_screen(35.0, 139.0);
        assert_eq!(s.pin_at(x, y - 5.0).map(|p| p.id.as_str()), Some("over"));
        assert!(s.pin_at(x + 200.0, y).is_none());
    }

    #[test]
    fn draft_requires_a_user() {
        let s = apply(
            MapState::new(None),
            vec![MapAction::OpenDraft { latitude: 1.0, longitude: 2.0 }],
        );
        assert_eq!(s.overlay, Overlay::None);
        assert!(s.draft().is_none());
        assert_eq!(
            DraftPin::at(1.0, 2.0).to_new_pin(None),
            Err(AppError::NotLoggedIn)
        );
    }

    #[test]
    fn draft_replaces_viewing_popup() {
        let s = apply(
            MapState::new(Some("alice".into())),
            vec![
                MapAction::PinsLoaded(vec![pin("1", "a", 0.0, 0.0)]),
                MapAction::SelectPin("1".into()),
                MapAction::OpenDraft { latitude: 3.0, longitude: 4.0 },
            ],
        );
        assert!(s.selected_pin().is_none());
        assert!(s.draft().is_some());
        let s = s.reduce(MapAction::ClosePopup);
        assert_eq!(s.overlay, Overlay::None);
    }

    #[test]
    fn double_click_submit_scenario() {
        let mut initial = MapState::new(Some("alice".into()));
        initial.viewport.recenter(35.85, 139.29);
        let s = apply(
            initial,
            vec![
                MapAction::PinsLoaded(vec![pin("1", "bob", 35.0, 139.0)]),
                MapAction::OpenDraft { latitude: 35.86, longitude: 139.30 },
                MapAction::EditTitle("Nice spot".into()),
                MapAction::EditDescription("Quiet park".into()),
                MapAction::EditRating("4".parse().unwrap()),
            ],
        );
        let draft = s.draft().unwrap();
        assert_eq!((draft.latitude, draft.longitude), (35.86, 139.30));

        let body = draft.to_new_pin(s.user.as_deref()).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "username": "alice",
                "title": "Nice spot",
                "desc": "Quiet park",
                "rating": 4,
                "lat": 35.86,
                "lng": 139.30
            })
        );

        let s = s.reduce(MapAction::SubmitStarted);
        assert!(s.draft().unwrap().submitting);

        let created = Pin {
            id: "new".into(),
            username: "alice".into(),
            title: "Nice spot".into(),
            description: "Quiet park".into(),
            rating: "4".parse().unwrap(),
            latitude: 35.86,
            longitude: 139.30,
            created_at: Some("2021-08-30T10:00:00.000Z".into()),
        };
        let s = s.reduce(MapAction::PinCreated(created.clone()));
        assert_eq!(s.pins.len(), 2);
        assert!(s.draft().is_none());

        let s = s.reduce(MapAction::PinCreated(created));
        assert_eq!(s.pins.iter().filter(|p| p.id == "new").count(), 1);
    }

    #[test]
    fn double_click_on_marker_keeps_its_popup() {
        let s = apply(
            MapState::new(Some("alice".into())),
            vec![MapAction::PinsLoaded(vec![pin("p", "bob", 40.0, 150.0)])],
        );
        let (x, y) = s.viewport.to_screen(40.0, 150.0);
        let (x, y) = (x, y - 5.0);
        let mut drag = DragState::default();

        let hit = s.pin_at(x, y).map(|p| p.id.clone());
        assert_eq!(hit.as_deref(), Some("p"));
        drag.record_click(1, hit.is_some());
        let s = s.reduce(MapAction::SelectPin("p".into()));

        // Recentering moved the marker away from the cursor
        drag.record_click(2, s.pin_at(x, y).is_some());
        assert_eq!(s.draft_target(x, y, drag.marker_clicked), None);
        assert_eq!(s.overlay, Overlay::Viewing("p".into()));

        // A fresh double-click on empty map still drafts
        drag.record_click(1, false);
        drag.record_click(2, false);
        let (lat, lng) = s.draft_target(x, y, drag.marker_clicked).unwrap();
        let s = s.reduce(MapAction::OpenDraft { latitude: lat, longitude: lng });
        assert!(s.draft().is_some());

        let logged_out = MapState::new(None);
        assert_eq!(logged_out.draft_target(10.0, 10.0, false), None);
    }

    #[test]
    fn late_create_response_keeps_a_newer_draft() {
        let s = apply(
            MapState::new(Some("alice".into())),
            vec![
                MapAction::OpenDraft { latitude: 1.0, longitude: 1.0 },
                MapAction::SubmitStarted,
                MapAction::ClosePopup,
                MapAction::OpenDraft { latitude: 2.0, longitude: 2.0 },
                MapAction::EditTitle("typing".into()),
                MapAction::PinCreated(pin("a", "alice", 1.0, 1.0)),
            ],
        );
        assert_eq!(s.pins.len(), 1);
        let d = s.draft().unwrap();
        assert_eq!((d.latitude, d.title.as_str()), (2.0, "typing"));
    }

    #[test]
    fn failed_submit_keeps_draft_open() {
        let s = apply(
            MapState::new(Some("alice".into())),
            vec![
                MapAction::OpenDraft { latitude: 1.0, longitude: 1.0 },
                MapAction::EditTitle("x".into()),
                MapAction::SubmitStarted,
                MapAction::SubmitFailed(AppError::Http { status: 500 }),
            ],
        );
        let d = s.draft().unwrap();
        assert!(!d.submitting);
        assert_eq!(d.title, "x");
        assert_eq!(s.error, Some(AppError::Http { status: 500 }));
        let s = s.reduce(MapAction::DismissError);
        assert!(s.error.is_none());
    }

    #[test]
    fn logout_drops_draft_and_own_styling() {
        let s = apply(
            MapState::new(Some("alice".into())),
            vec![
                MapAction::PinsLoaded(vec![pin("1", "alice", 0.0, 0.0)]),
                MapAction::OpenDraft { latitude: 1.0, longitude: 1.0 },
            ],
        );
        assert!(s.is_own(&s.pins[0]));
        let s = s.reduce(MapAction::LoggedOut);
        assert!(s.user.is_none());
        assert!(s.draft().is_none());
        assert!(!s.is_own(&s.pins[0]));
    }

    #[test]
    fn auth_forms_only_when_logged_out() {
        let s = Rc::new(MapState::new(None)).reduce(MapAction::ShowRegister);
        assert_eq!(s.overlay, Overlay::Register);
        let s = s.reduce(MapAction::ShowLogin);
        assert_eq!(s.overlay, Overlay::Login);
        let s = s.reduce(MapAction::LoggedIn("carol".into()));
        assert_eq!(s.user.as_deref(), Some("carol"));
        assert_eq!(s.overlay, Overlay::None);
        let s = s.reduce(MapAction::ShowLogin);
        assert_eq!(s.overlay, Overlay::None);
    }

    #[test]
    fn edits_without_draft_are_ignored() {
        let s = Rc::new(MapState::new(Some("a".into())));
        let v = s.version;
        let s = s.reduce(MapAction::EditTitle("t".into()));
        assert_eq!(s.version, v);
        assert_eq!(s.overlay, Overlay::None);
    }

    #[test]
    fn reset_view_restores_initial_center() {
        let s = apply(
            MapState::new(None),
            vec![
                MapAction::Resize { width: 1024.0, height: 768.0 },
                MapAction::Pan { dx: 300.0, dy: 100.0 },
                MapAction::ZoomBy(2.0),
                MapAction::ResetView,
            ],
        );
        let d = Viewport::default();
        assert!((s.viewport.latitude - d.latitude).abs() < 1e-9);
        assert!((s.viewport.longitude - d.longitude).abs() < 1e-9);
        assert_eq!(s.viewport.zoom, d.zoom);
        assert_eq!(s.viewport.width, 1024.0);
    }
}
