use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use eframe::egui;
use image::DynamicImage;

use crate::codec;
use crate::config::Config;
use crate::geometry::Corner;
use crate::interaction::{Annotator, Input, Modifiers, PointerButton};
use crate::region::{format_hex_color, parse_hex_color, FieldKind, FieldType, RegionId, TextAlign};
use crate::selection::Shift;

const REGION_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 40, 40);
const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 120, 255);

// ── Loading ─────────────────────────────────────────────────────────────────

pub fn load_image(path: &Path) -> anyhow::Result<DynamicImage> {
    image::open(path).with_context(|| format!("opening image {}", path.display()))
}

pub fn read_document(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading fields {}", path.display()))
}

/// Where "Save" writes when no document was given: next to the image.
pub fn default_document_path(image_path: &Path) -> PathBuf {
    let name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(codec::suggested_file_name(&name))
}

// ── App ─────────────────────────────────────────────────────────────────────

enum ListAction {
    Select(RegionId),
    Move(usize, usize),
}

pub struct AnnotateApp {
    template_name: String,
    document_path: PathBuf,
    texture: Option<egui::TextureHandle>,
    image_size: egui::Vec2,
    raw_image: Option<DynamicImage>,
    fitted: bool,

    annotator: Annotator,
    status: Option<String>,
}

impl AnnotateApp {
    /// An explicit `document` must be readable; otherwise a document next to
    /// the image is picked up when present.
    pub fn new(image_path: PathBuf, document: Option<PathBuf>, config: Config) -> anyhow::Result<Self> {
        let raw_image = load_image(&image_path)?;
        let image_size = egui::vec2(raw_image.width() as f32, raw_image.height() as f32);
        let template_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut annotator = Annotator::new(config);
        let document_path = match document {
            Some(path) => {
                annotator.load_document(&read_document(&path)?);
                path
            }
            None => {
                let path = default_document_path(&image_path);
                if path.exists() {
                    annotator.load_document(&read_document(&path)?);
                }
                path
            }
        };
        log::info!(
            "editing {} ({}x{}), fields at {}",
            image_path.display(),
            image_size.x,
            image_size.y,
            document_path.display()
        );

        Ok(Self::with_annotator(
            template_name,
            document_path,
            image_size,
            Some(raw_image),
            annotator,
        ))
    }

    fn with_annotator(
        template_name: String,
        document_path: PathBuf,
        image_size: egui::Vec2,
        raw_image: Option<DynamicImage>,
        annotator: Annotator,
    ) -> Self {
        Self {
            template_name,
            document_path,
            texture: None,
            image_size,
            raw_image,
            fitted: false,
            annotator,
            status: None,
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(img) = self.raw_image.take() {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture("template", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn save_to(&mut self, path: PathBuf) {
        let result = self
            .annotator
            .export_document(&self.template_name)
            .context("encoding fields")
            .and_then(|text| {
                std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))
            });
        match result {
            Ok(()) => {
                log::info!("saved {} fields to {}", self.annotator.regions().len(), path.display());
                self.status = Some(format!("Saved {}", path.display()));
                self.document_path = path;
            }
            Err(err) => {
                log::error!("{err:#}");
                self.status = Some(format!("{err:#}"));
            }
        }
    }

    fn save_as(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name(codec::suggested_file_name(&self.template_name));
        if let Some(dir) = self.document_path.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.save_file() {
            self.save_to(path);
        }
    }

    fn open_document(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .pick_file()
        else {
            return;
        };
        match read_document(&path) {
            Ok(text) => {
                if let Some(template) = self.annotator.load_document(&text) {
                    if template != self.template_name {
                        log::warn!("fields were drawn on `{template}`, editing `{}`", self.template_name);
                    }
                }
                self.status = Some(format!("Loaded {}", path.display()));
                self.document_path = path;
            }
            Err(err) => {
                log::error!("{err:#}");
                self.status = Some(format!("{err:#}"));
            }
        }
    }

    // ── Input ───────────────────────────────────────────────────────────────

    fn route_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect, hovered: bool) {
        let (events, time) = ctx.input(|i| (i.events.clone(), i.time));
        for event in &events {
            if let Some(input) = translate_event(event, time, |pos| hovered && canvas_rect.contains(pos)) {
                self.annotator.handle(input);
            }
        }
        self.annotator.handle(Input::Tick { time });
        if self.annotator.hold_pending() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }

    // ── Painting ────────────────────────────────────────────────────────────

    fn draw_regions(&self, painter: &egui::Painter) {
        let viewport = self.annotator.viewport();
        let selection = self.annotator.selection();
        for region in self.annotator.regions() {
            let rect = viewport.rect_to_screen(&region.rect);
            let color = if selection.is(region.id()) {
                SELECTED_COLOR
            } else {
                REGION_COLOR
            };
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.5, color), egui::StrokeKind::Middle);
            painter.text(
                rect.left_top() - egui::vec2(0.0, 2.0),
                egui::Align2::LEFT_BOTTOM,
                &region.name,
                egui::FontId::proportional(12.0),
                color,
            );
        }
        if let Some(region) = self.annotator.selected() {
            let size = self.annotator.config().viewport.handle_size;
            for corner in Corner::ALL {
                let center = viewport.to_screen(region.rect.corner(corner));
                painter.rect(
                    egui::Rect::from_center_size(center, egui::Vec2::splat(size)),
                    0.0,
                    egui::Color32::WHITE,
                    egui::Stroke::new(1.0, SELECTED_COLOR),
                    egui::StrokeKind::Middle,
                );
            }
        }
    }

    // ── Side panel ──────────────────────────────────────────────────────────

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("−").clicked() {
                self.annotator.viewport_mut().zoom_out();
            }
            if ui.button("+").clicked() {
                self.annotator.viewport_mut().zoom_in();
            }
            if ui.button("Fit").clicked() {
                self.annotator.viewport_mut().reset_zoom();
            }
            ui.label(format!("Zoom: {:.0}%", self.annotator.viewport().zoom() * 100.0));
        });
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                self.save_to(self.document_path.clone());
            }
            if ui.button("Save as…").clicked() {
                self.save_as();
            }
            if ui.button("Open fields…").clicked() {
                self.open_document();
            }
        });
        if let Some(status) = &self.status {
            ui.small(status.as_str());
        }
    }

    fn properties(&mut self, ui: &mut egui::Ui) {
        ui.heading("Field");
        let default_style = self.annotator.config().new_field.style.clone();
        let text_types = self.annotator.config().new_field.text_types.clone();
        let Some(region) = self.annotator.selected_mut() else {
            ui.label("Select a field, or Shift+drag on the image to draw one.");
            return;
        };
        let id = region.id();

        egui::Grid::new("field_properties")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut region.name);
                ui.end_row();

                ui.label("Type");
                let current = region.field_type.kind();
                let mut chosen = current;
                let selected_text = match &region.field_type {
                    FieldType::Other(token) => token.clone(),
                    other => other.kind().map(FieldKind::label).unwrap_or_default().to_owned(),
                };
                egui::ComboBox::from_id_salt("field_kind")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for kind in FieldKind::ALL {
                            ui.selectable_value(&mut chosen, Some(kind), kind.label());
                        }
                    });
                if let Some(kind) = chosen.filter(|_| chosen != current) {
                    region.field_type.retype(kind, &default_style);
                }
                ui.end_row();

                if let Some(style) = region.field_type.text_style_mut() {
                    ui.label("Font");
                    ui.text_edit_singleline(&mut style.font);
                    ui.end_row();

                    ui.label("Font size");
                    ui.add(egui::DragValue::new(&mut style.font_size).range(0..=400));
                    ui.end_row();

                    ui.label("Font color");
                    let mut rgb = parse_hex_color(&style.font_color).unwrap_or([0, 0, 0]);
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        style.font_color = format_hex_color(rgb);
                    }
                    ui.end_row();

                    ui.label("Text type");
                    ui.horizontal(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut style.text_type).desired_width(100.0));
                        egui::ComboBox::from_id_salt("text_type")
                            .selected_text("")
                            .width(24.0)
                            .show_ui(ui, |ui| {
                                for category in &text_types {
                                    ui.selectable_value(&mut style.text_type, category.clone(), category.as_str());
                                }
                            });
                    });
                    ui.end_row();

                    ui.label("Align");
                    ui.horizontal(|ui| {
                        for align in TextAlign::ALL {
                            ui.selectable_value(&mut style.text_align, align, align.as_str());
                        }
                    });
                    ui.end_row();
                }
            });

        let rect = region.rect;
        ui.small(format!(
            "x {:.0}  y {:.0}  w {:.0}  h {:.0}",
            rect.left, rect.top, rect.width, rect.height
        ));
        if ui.button("Delete").clicked() {
            self.annotator.delete(id);
        }
    }

    fn region_list(&mut self, ui: &mut egui::Ui) {
        ui.heading("Fields");
        let selection = self.annotator.selection();
        let len = self.annotator.regions().len();
        let mut action = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, region) in self.annotator.regions().iter().enumerate() {
                ui.horizontal(|ui| {
                    if ui.small_button("▲").clicked() {
                        action = Shift::Up.target(index, len).map(|to| ListAction::Move(index, to));
                    }
                    if ui.small_button("▼").clicked() {
                        action = Shift::Down.target(index, len).map(|to| ListAction::Move(index, to));
                    }
                    let label = if region.name.is_empty() {
                        "(unnamed)"
                    } else {
                        region.name.as_str()
                    };
                    if ui.selectable_label(selection.is(region.id()), label).clicked() {
                        action = Some(ListAction::Select(region.id()));
                    }
                });
            }
        });

        match action {
            Some(ListAction::Select(id)) => self.annotator.select(Some(id)),
            Some(ListAction::Move(from, to)) => {
                self.annotator.reorder(from, to);
            }
            None => {}
        }
    }
}

fn translate_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Presses only count where `accepts_press` says so (over the canvas and
/// not under another widget); motion and releases always go through so a
/// gesture can finish outside the canvas.
fn translate_event(event: &egui::Event, time: f64, accepts_press: impl Fn(egui::Pos2) -> bool) -> Option<Input> {
    match event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            modifiers,
        } if accepts_press(*pos) => Some(Input::Press {
            pos: *pos,
            button: translate_button(*button)?,
            modifiers: Modifiers {
                shift: modifiers.shift,
                ctrl: modifiers.ctrl || modifiers.mac_cmd,
                alt: modifiers.alt,
            },
            time,
        }),
        egui::Event::PointerButton {
            pos,
            button,
            pressed: false,
            ..
        } => Some(Input::Release {
            pos: *pos,
            button: translate_button(*button)?,
        }),
        egui::Event::PointerMoved(pos) => Some(Input::Motion { pos: *pos, time }),
        egui::Event::Key {
            key: egui::Key::Escape,
            pressed: true,
            ..
        } => Some(Input::Cancel),
        _ => None,
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        // Keyboard shortcuts
        let editing_text = ctx.memory(|m| m.focused().is_some());
        let (save, delete) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::Delete),
            )
        });
        if save {
            self.save_to(self.document_path.clone());
        }
        if delete && !editing_text {
            self.annotator.delete_selected();
        }

        egui::SidePanel::right("fields")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                self.toolbar(ui);
                ui.separator();
                self.properties(ui);
                ui.separator();
                self.region_list(ui);
            });

        // Canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;
            self.annotator
                .viewport_mut()
                .set_frame(canvas_rect.min, canvas_rect.size());
            if !self.fitted && self.texture.is_some() && canvas_rect.area() > 0.0 {
                self.annotator.viewport_mut().fit_image(self.image_size);
                self.fitted = true;
            }

            self.route_input(ctx, canvas_rect, response.contains_pointer());

            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));
            if let Some(ref tex) = self.texture {
                let viewport = self.annotator.viewport();
                let img_rect = egui::Rect::from_min_max(
                    viewport.to_screen(egui::Pos2::ZERO),
                    viewport.to_screen(self.image_size.to_pos2()),
                );
                painter.image(
                    tex.id(),
                    img_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            self.draw_regions(&painter);
        });
    }
}
