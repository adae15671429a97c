//! Pointer-driven editing: turns press/move/release/cancel input into
//! region creation, moves, resizes and viewport pans.

use egui::{Pos2, Vec2};

use crate::codec;
use crate::config::{Config, CreateGesture, ModifierKey};
use crate::geometry::{Corner, FieldRect, Viewport};
use crate::region::{FieldKind, FieldType, Region, RegionId, RegionList};
use crate::selection::Selection;

// ── Input ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub fn holds(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
        }
    }
}

/// Screen-space input. `time` is in seconds on any monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Press {
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
        time: f64,
    },
    Motion {
        pos: Pos2,
        time: f64,
    },
    Release {
        pos: Pos2,
        button: PointerButton,
    },
    /// The cancel key (Escape).
    Cancel,
    /// Lets a held long press fire without pointer motion.
    Tick {
        time: f64,
    },
}

// ── Modes ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Idle,
    Drawing {
        id: RegionId,
        anchor: Pos2,
    },
    Moving {
        id: RegionId,
        /// Press point relative to the region's top-left, logical units.
        grab: Vec2,
    },
    Resizing {
        id: RegionId,
        corner: Corner,
        initial: FieldRect,
    },
    Panning {
        anchor: Pos2,
        anchor_scroll: Vec2,
        button: PointerButton,
        /// Press time while a long press may still turn this into a draw.
        armed_since: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Drawing,
    Moving,
    Resizing,
    Panning,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::Drawing { .. } => ModeKind::Drawing,
            Mode::Moving { .. } => ModeKind::Moving,
            Mode::Resizing { .. } => ModeKind::Resizing,
            Mode::Panning { .. } => ModeKind::Panning,
        }
    }

    fn region(&self) -> Option<RegionId> {
        match *self {
            Mode::Drawing { id, .. } | Mode::Moving { id, .. } | Mode::Resizing { id, .. } => {
                Some(id)
            }
            Mode::Idle | Mode::Panning { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PressTarget {
    Handle(RegionId, Corner),
    Body(RegionId, Vec2),
    Background,
}

// ── Annotator ───────────────────────────────────────────────────────────────

pub struct Annotator {
    config: Config,
    regions: RegionList,
    selection: Selection,
    viewport: Viewport,
    mode: Mode,
}

impl Annotator {
    pub fn new(config: Config) -> Self {
        Self::with_regions(config, RegionList::new())
    }

    pub fn with_regions(config: Config, regions: RegionList) -> Self {
        let viewport = Viewport::new(&config.viewport);
        Self {
            config,
            regions,
            selection: Selection::default(),
            viewport,
            mode: Mode::Idle,
        }
    }

    /// Replace all regions with the contents of a field document. Returns the
    /// document's template reference, if any.
    pub fn load_document(&mut self, text: &str) -> Option<String> {
        let doc = codec::decode_document(text, &self.config.field_types);
        log::info!("loaded {} fields", doc.regions.len());
        self.regions = RegionList::from_regions(doc.regions);
        self.selection.clear();
        self.mode = Mode::Idle;
        self.viewport.reset_zoom();
        self.viewport.set_scroll(Vec2::ZERO);
        doc.template
    }

    pub fn export_document(&self, template: &str) -> serde_yaml::Result<String> {
        codec::encode(template, self.regions.as_slice(), &self.config.field_types)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn regions(&self) -> &RegionList {
        &self.regions
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&Region> {
        self.regions.get(self.selection.get()?)
    }

    pub fn selected_mut(&mut self) -> Option<&mut Region> {
        self.regions.get_mut(self.selection.get()?)
    }

    /// Select (or deselect) without touching the current mode.
    pub fn select(&mut self, id: Option<RegionId>) {
        match id {
            Some(id) if self.regions.get(id).is_some() => self.selection.select(id),
            Some(_) => {}
            None => self.selection.clear(),
        }
    }

    /// Remove a region. Always clears the selection; a gesture working on the
    /// removed region ends.
    pub fn delete(&mut self, id: RegionId) -> bool {
        let removed = self.regions.remove(id).is_some();
        self.selection.clear();
        if removed && self.mode.region() == Some(id) {
            self.mode = Mode::Idle;
        }
        if removed {
            log::debug!("deleted region {id}");
        }
        removed
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selection.get() {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    /// Move the list entry at `from` to `to`; geometry and attributes stay.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.regions.reorder(from, to)
    }

    pub fn set_kind(&mut self, id: RegionId, kind: FieldKind) {
        let default_style = &self.config.new_field.style;
        if let Some(region) = self.regions.get_mut(id) {
            region.field_type.retype(kind, default_style);
        }
    }

    /// True while a long press is waiting to turn into a draw; the caller
    /// should keep sending `Input::Tick`.
    pub fn hold_pending(&self) -> bool {
        matches!(
            self.mode,
            Mode::Panning {
                armed_since: Some(_),
                ..
            }
        )
    }

    pub fn handle(&mut self, input: Input) {
        let before = self.mode.kind();
        match input {
            Input::Press {
                pos,
                button,
                modifiers,
                time,
            } => self.press(pos, button, modifiers, time),
            Input::Motion { pos, time } => {
                self.fire_hold(time);
                self.motion(pos);
            }
            Input::Release { pos, button } => self.release(pos, button),
            Input::Cancel => self.cancel(),
            Input::Tick { time } => self.fire_hold(time),
        }
        let after = self.mode.kind();
        if before != after {
            log::debug!("{before:?} -> {after:?}");
        }
    }

    fn press(&mut self, pos: Pos2, button: PointerButton, modifiers: Modifiers, time: f64) {
        if !matches!(self.mode, Mode::Idle) {
            if matches!(self.mode, Mode::Drawing { .. }) && button == PointerButton::Secondary {
                self.cancel();
            }
            return;
        }
        match button {
            PointerButton::Primary => {}
            PointerButton::Middle => {
                self.begin_pan(pos, button, None);
                return;
            }
            PointerButton::Secondary => return,
        }

        match self.press_target(pos) {
            PressTarget::Handle(id, corner) => {
                if let Some(region) = self.regions.get(id) {
                    self.mode = Mode::Resizing {
                        id,
                        corner,
                        initial: region.rect,
                    };
                }
            }
            PressTarget::Body(id, grab) => {
                self.selection.select(id);
                self.mode = Mode::Moving { id, grab };
            }
            PressTarget::Background => match self.config.interaction.create {
                CreateGesture::Modifier { key } if modifiers.holds(key) => {
                    let at = self.viewport.to_logical(pos);
                    self.begin_drawing(at);
                }
                CreateGesture::Modifier { .. } => self.begin_pan(pos, button, None),
                CreateGesture::LongPress { .. } => self.begin_pan(pos, button, Some(time)),
            },
        }
    }

    fn motion(&mut self, pos: Pos2) {
        let logical = self.viewport.to_logical(pos);
        match self.mode {
            Mode::Idle => {}
            Mode::Drawing { id, anchor } => {
                if let Some(region) = self.regions.get_mut(id) {
                    region.rect = FieldRect::from_corners(anchor, logical);
                }
            }
            Mode::Moving { id, grab } => {
                if let Some(region) = self.regions.get_mut(id) {
                    region.rect.left = logical.x - grab.x;
                    region.rect.top = logical.y - grab.y;
                }
            }
            Mode::Resizing { id, corner, initial } => {
                if let Some(region) = self.regions.get_mut(id) {
                    region.rect = initial.resized(corner, logical);
                }
            }
            Mode::Panning {
                anchor,
                anchor_scroll,
                button,
                armed_since,
            } => {
                let delta = pos - anchor;
                let armed_since =
                    armed_since.filter(|_| delta.length() <= self.config.interaction.hold_slop);
                self.viewport.set_scroll(anchor_scroll - delta);
                self.mode = Mode::Panning {
                    anchor,
                    anchor_scroll,
                    button,
                    armed_since,
                };
            }
        }
    }

    fn release(&mut self, pos: Pos2, button: PointerButton) {
        match self.mode {
            Mode::Idle => {}
            Mode::Drawing { id, anchor } => {
                if button == PointerButton::Primary {
                    let rect = FieldRect::from_corners(anchor, self.viewport.to_logical(pos));
                    self.commit_drawing(id, rect);
                }
            }
            Mode::Moving { .. } | Mode::Resizing { .. } => {
                if button == PointerButton::Primary {
                    self.mode = Mode::Idle;
                }
            }
            Mode::Panning { button: started, .. } => {
                if button == started {
                    self.mode = Mode::Idle;
                }
            }
        }
    }

    /// Only an in-progress draw can be cancelled.
    fn cancel(&mut self) {
        if let Mode::Drawing { id, .. } = self.mode {
            log::debug!("draw of {id} cancelled");
            self.discard(id);
        }
    }

    fn fire_hold(&mut self, time: f64) {
        let CreateGesture::LongPress { delay_ms } = self.config.interaction.create else {
            return;
        };
        let Mode::Panning {
            anchor,
            anchor_scroll,
            armed_since: Some(since),
            ..
        } = self.mode
        else {
            return;
        };
        if time - since < delay_ms as f64 / 1000.0 {
            return;
        }
        self.viewport.set_scroll(anchor_scroll);
        let at = self.viewport.to_logical(anchor);
        self.begin_drawing(at);
    }

    fn begin_pan(&mut self, pos: Pos2, button: PointerButton, armed_since: Option<f64>) {
        self.mode = Mode::Panning {
            anchor: pos,
            anchor_scroll: self.viewport.scroll(),
            button,
            armed_since,
        };
    }

    fn begin_drawing(&mut self, at: Pos2) {
        let name = self.regions.unique_name(&self.config.new_field.name_prefix);
        let field_type = FieldType::Text(self.config.new_field.style.clone());
        let id = self.regions.add(name, field_type, FieldRect::at(at));
        self.selection.select(id);
        self.mode = Mode::Drawing { id, anchor: at };
    }

    fn commit_drawing(&mut self, id: RegionId, rect: FieldRect) {
        if !rect.meets_minimum() {
            log::debug!("discarding {id}: {:.2}x{:.2} is below the minimum", rect.width, rect.height);
            self.discard(id);
            return;
        }
        if let Some(region) = self.regions.get_mut(id) {
            region.rect = rect;
        }
        self.mode = Mode::Idle;
    }

    fn discard(&mut self, id: RegionId) {
        self.regions.remove(id);
        self.selection.clear();
        self.mode = Mode::Idle;
    }

    /// Handles of the selected region win over bodies; bodies are tested top
    /// (last painted) first.
    fn press_target(&self, pos: Pos2) -> PressTarget {
        let logical = self.viewport.to_logical(pos);
        let reach = self
            .viewport
            .to_logical_len(self.config.viewport.handle_size * 0.5);

        if let Some(selected) = self.selected() {
            for corner in Corner::ALL {
                let c = selected.rect.corner(corner);
                if (logical.x - c.x).abs() <= reach && (logical.y - c.y).abs() <= reach {
                    return PressTarget::Handle(selected.id(), corner);
                }
            }
        }

        self.regions
            .iter()
            .rev()
            .find(|region| region.rect.contains(logical))
            .map(|region| PressTarget::Body(region.id(), logical - region.rect.min()))
            .unwrap_or(PressTarget::Background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InteractionConfig;
    use egui::{pos2, vec2};

    fn annotator() -> Annotator {
        let mut a = Annotator::new(Config::default());
        a.viewport_mut().set_frame(Pos2::ZERO, vec2(800.0, 600.0));
        a
    }

    fn long_press_annotator() -> Annotator {
        let config = Config {
            interaction: InteractionConfig {
                create: CreateGesture::LongPress { delay_ms: 300 },
                ..InteractionConfig::default()
            },
            ..Config::default()
        };
        let mut a = Annotator::new(config);
        a.viewport_mut().set_frame(Pos2::ZERO, vec2(800.0, 600.0));
        a
    }

    fn press(a: &mut Annotator, x: f32, y: f32, modifiers: Modifiers) {
        a.handle(Input::Press {
            pos: pos2(x, y),
            button: PointerButton::Primary,
            modifiers,
            time: 0.0,
        });
    }

    fn drag_to(a: &mut Annotator, x: f32, y: f32) {
        a.handle(Input::Motion {
            pos: pos2(x, y),
            time: 0.0,
        });
    }

    fn release(a: &mut Annotator, x: f32, y: f32) {
        a.handle(Input::Release {
            pos: pos2(x, y),
            button: PointerButton::Primary,
        });
    }

    fn draw(a: &mut Annotator, from: (f32, f32), to: (f32, f32)) {
        press(a, from.0, from.1, Modifiers::SHIFT);
        drag_to(a, to.0, to.1);
        release(a, to.0, to.1);
    }

    #[test]
    fn shift_drag_draws_a_text_region() {
        let mut a = annotator();
        press(&mut a, 10.0, 10.0, Modifiers::SHIFT);
        assert_eq!(a.mode().kind(), ModeKind::Drawing);
        assert_eq!(a.regions().len(), 1);
        assert_eq!(a.selected().unwrap().rect, FieldRect::new(10.0, 10.0, 0.0, 0.0));

        drag_to(&mut a, 60.0, 60.0);
        release(&mut a, 60.0, 60.0);

        assert_eq!(a.mode(), &Mode::Idle);
        let region = &a.regions().as_slice()[0];
        assert_eq!(region.rect, FieldRect::new(10.0, 10.0, 50.0, 50.0));
        assert_eq!(region.name, "field_0");
        assert!(region.field_type.text_style().is_some());
        assert!(a.selection().is(region.id()));
    }

    #[test]
    fn drawing_backwards_normalizes() {
        let mut a = annotator();
        draw(&mut a, (60.0, 80.0), (10.0, 20.0));
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(10.0, 20.0, 50.0, 60.0));
    }

    #[test]
    fn drawing_respects_zoom_and_scroll() {
        let mut a = annotator();
        a.viewport_mut().set_scroll(vec2(40.0, 0.0));
        a.viewport_mut().zoom_in();
        a.viewport_mut().zoom_in();
        a.viewport_mut().reset_zoom();
        draw(&mut a, (0.0, 0.0), (20.0, 20.0));
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(40.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn tiny_draw_is_discarded() {
        let mut a = annotator();
        draw(&mut a, (10.0, 10.0), (10.5, 40.0));
        assert!(a.regions().is_empty());
        assert_eq!(a.selection().get(), None);
        assert_eq!(a.mode(), &Mode::Idle);
    }

    #[test]
    fn cancel_key_and_right_click_drop_the_draft() {
        let mut a = annotator();
        press(&mut a, 10.0, 10.0, Modifiers::SHIFT);
        drag_to(&mut a, 50.0, 50.0);
        a.handle(Input::Cancel);
        assert!(a.regions().is_empty());
        assert_eq!(a.mode(), &Mode::Idle);

        press(&mut a, 10.0, 10.0, Modifiers::SHIFT);
        drag_to(&mut a, 50.0, 50.0);
        a.handle(Input::Press {
            pos: pos2(50.0, 50.0),
            button: PointerButton::Secondary,
            modifiers: Modifiers::NONE,
            time: 0.0,
        });
        assert!(a.regions().is_empty());
        assert_eq!(a.selection().get(), None);
        assert_eq!(a.mode(), &Mode::Idle);
    }

    #[test]
    fn cancel_outside_drawing_changes_nothing() {
        let mut a = annotator();
        draw(&mut a, (10.0, 10.0), (60.0, 60.0));
        press(&mut a, 30.0, 30.0, Modifiers::NONE);
        drag_to(&mut a, 40.0, 50.0);
        a.handle(Input::Cancel);
        assert_eq!(a.mode().kind(), ModeKind::Moving);
        release(&mut a, 40.0, 50.0);
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(20.0, 30.0, 50.0, 50.0));
    }

    #[test]
    fn moving_keeps_the_grab_offset_and_is_unclamped() {
        let mut a = annotator();
        draw(&mut a, (10.0, 10.0), (60.0, 60.0));
        a.select(None);

        press(&mut a, 20.0, 30.0, Modifiers::NONE);
        assert_eq!(a.mode().kind(), ModeKind::Moving);
        assert!(a.selected().is_some());
        drag_to(&mut a, 0.0, 5.0);
        release(&mut a, 0.0, 5.0);

        assert_eq!(a.mode(), &Mode::Idle);
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(-10.0, -15.0, 50.0, 50.0));
    }

    #[test]
    fn topmost_region_is_grabbed() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (100.0, 100.0));
        // a shift-press on a region grabs it, so start the overlap outside
        draw(&mut a, (150.0, 150.0), (50.0, 50.0));
        let top = a.regions().as_slice()[1].id();
        a.select(None);
        press(&mut a, 75.0, 75.0, Modifiers::NONE);
        assert!(matches!(a.mode(), Mode::Moving { id, .. } if *id == top));
    }

    #[test]
    fn corner_handles_resize_against_the_opposite_corner() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (40.0, 40.0));

        press(&mut a, 1.0, -2.0, Modifiers::NONE);
        assert!(matches!(
            a.mode(),
            Mode::Resizing {
                corner: Corner::NorthWest,
                ..
            }
        ));
        drag_to(&mut a, 50.0, 10.0);
        release(&mut a, 50.0, 10.0);
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(40.0, 10.0, 10.0, 30.0));

        // ne handle of the resized rect sits at (50, 10)
        press(&mut a, 50.0, 10.0, Modifiers::NONE);
        assert!(matches!(
            a.mode(),
            Mode::Resizing {
                corner: Corner::NorthEast,
                ..
            }
        ));
        drag_to(&mut a, 60.0, 0.0);
        release(&mut a, 60.0, 0.0);
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(40.0, 0.0, 20.0, 40.0));
    }

    #[test]
    fn handles_belong_to_the_selected_region_only() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (40.0, 40.0));
        a.select(None);
        press(&mut a, 0.0, 0.0, Modifiers::NONE);
        assert_eq!(a.mode().kind(), ModeKind::Moving);
    }

    #[test]
    fn background_drag_pans_by_the_negative_delta() {
        let mut a = annotator();
        a.viewport_mut().set_scroll(vec2(100.0, 100.0));
        press(&mut a, 300.0, 300.0, Modifiers::NONE);
        assert_eq!(a.mode().kind(), ModeKind::Panning);
        drag_to(&mut a, 280.0, 330.0);
        assert_eq!(a.viewport().scroll(), vec2(120.0, 70.0));
        release(&mut a, 280.0, 330.0);
        assert_eq!(a.mode(), &Mode::Idle);
        assert!(a.regions().is_empty());
    }

    #[test]
    fn middle_button_pans_over_regions() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (100.0, 100.0));
        a.handle(Input::Press {
            pos: pos2(50.0, 50.0),
            button: PointerButton::Middle,
            modifiers: Modifiers::NONE,
            time: 0.0,
        });
        assert_eq!(a.mode().kind(), ModeKind::Panning);
        release(&mut a, 50.0, 50.0);
        assert_eq!(a.mode().kind(), ModeKind::Panning);
        a.handle(Input::Release {
            pos: pos2(50.0, 50.0),
            button: PointerButton::Middle,
        });
        assert_eq!(a.mode(), &Mode::Idle);
    }

    #[test]
    fn presses_outside_idle_are_ignored() {
        let mut a = annotator();
        press(&mut a, 10.0, 10.0, Modifiers::SHIFT);
        press(&mut a, 30.0, 30.0, Modifiers::SHIFT);
        assert_eq!(a.regions().len(), 1);
        assert_eq!(a.mode().kind(), ModeKind::Drawing);
    }

    #[test]
    fn long_press_promotes_to_drawing() {
        let mut a = long_press_annotator();
        a.handle(Input::Press {
            pos: pos2(10.0, 10.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            time: 1.0,
        });
        assert!(a.hold_pending());
        a.handle(Input::Motion {
            pos: pos2(11.0, 11.0),
            time: 1.1,
        });
        assert_eq!(a.mode().kind(), ModeKind::Panning);
        a.handle(Input::Tick { time: 1.31 });
        assert_eq!(a.mode().kind(), ModeKind::Drawing);
        assert_eq!(a.viewport().scroll(), Vec2::ZERO);

        a.handle(Input::Motion {
            pos: pos2(60.0, 60.0),
            time: 1.4,
        });
        release(&mut a, 60.0, 60.0);
        assert_eq!(a.regions().as_slice()[0].rect, FieldRect::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn moving_before_the_delay_keeps_panning() {
        let mut a = long_press_annotator();
        a.handle(Input::Press {
            pos: pos2(10.0, 10.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::SHIFT,
            time: 0.0,
        });
        a.handle(Input::Motion {
            pos: pos2(40.0, 10.0),
            time: 0.1,
        });
        assert!(!a.hold_pending());
        a.handle(Input::Tick { time: 2.0 });
        assert_eq!(a.mode().kind(), ModeKind::Panning);
        assert_eq!(a.viewport().scroll(), vec2(-30.0, 0.0));
        release(&mut a, 40.0, 10.0);
        assert!(a.regions().is_empty());
    }

    #[test]
    fn delete_clears_selection_and_ends_gestures_on_it() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (40.0, 40.0));
        draw(&mut a, (50.0, 50.0), (90.0, 90.0));
        let first = a.regions().as_slice()[0].id();
        press(&mut a, 10.0, 10.0, Modifiers::NONE);
        assert!(a.delete(first));
        assert_eq!(a.mode(), &Mode::Idle);
        assert_eq!(a.selection().get(), None);
        assert_eq!(a.regions().len(), 1);
        assert!(!a.delete_selected());
    }

    #[test]
    fn load_document_resets_state() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (40.0, 40.0));
        let template = a.load_document("template: a.png\nfields:\n  x:\n    width: 5\n    height: 5\n");
        assert_eq!(template.as_deref(), Some("a.png"));
        assert_eq!(a.regions().len(), 1);
        assert_eq!(a.selection().get(), None);

        draw(&mut a, (100.0, 100.0), (140.0, 140.0));
        let ids: Vec<_> = a.regions().iter().map(Region::id).collect();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(a.regions().as_slice()[1].name, "field_1");
    }

    #[test]
    fn reorder_keeps_selection_and_geometry() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (40.0, 40.0));
        draw(&mut a, (50.0, 50.0), (90.0, 90.0));
        draw(&mut a, (100.0, 100.0), (140.0, 140.0));
        let before: Vec<_> = a.regions().iter().map(|r| (r.id(), r.rect)).collect();
        let moved = before[0].0;
        a.select(Some(moved));

        assert!(a.reorder(0, 2));

        assert!(a.selection().is(moved));
        assert_eq!(a.regions().index_of(moved), Some(2));
        for (id, rect) in &before {
            assert_eq!(a.regions().get(*id).unwrap().rect, *rect);
        }
        let order: Vec<_> = a.regions().iter().map(Region::id).collect();
        assert_eq!(order, vec![before[1].0, before[2].0, moved]);
    }

    #[test]
    fn set_kind_switches_text_attributes() {
        let mut a = annotator();
        draw(&mut a, (0.0, 0.0), (40.0, 40.0));
        let id = a.regions().as_slice()[0].id();
        a.set_kind(id, FieldKind::Stamp);
        assert_eq!(a.regions().as_slice()[0].field_type, FieldType::Stamp);
        a.set_kind(id, FieldKind::Text);
        assert!(a.regions().as_slice()[0].field_type.text_style().is_some());
    }
}
