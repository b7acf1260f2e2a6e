use std::path::PathBuf;

use cgmath::Vector2;
use iced::widget::{button, column, container, row, text, text_editor};
use iced::{keyboard, Alignment, Element, Length, Subscription, Task, Theme};
use image::RgbaImage;
use rfd::FileDialog;

use crate::clipboard::ClipboardError;
use crate::state::cropper::{AspectRatio, CropperState, ExportFormat};
use crate::state::scratchpad::ScratchpadState;
use crate::state::selection::DragHandle;

mod clipboard;
mod export;
mod state;
mod ui;

/// Which tool is in front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTool {
    Scratchpad,
    Cropper,
}

/// Main application state
struct ClipPlayground {
    /// The tool currently shown
    tool: ActiveTool,
    /// Text scratchpad state
    scratchpad: ScratchpadState,
    /// Image cropper state
    cropper: CropperState,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User switched between the two tools
    ToolSelected(ActiveTool),
    /// Ctrl+V pressed outside any focused widget
    PasteShortcut,

    // Scratchpad
    EditorAction(text_editor::Action),
    ToggleLineNumbers,
    ToggleRelativeNumbers,
    ToggleWordWrap,
    PasteText,
    TextPasted(Result<String, ClipboardError>),
    CopyText,
    TextCopied(Result<(), ClipboardError>),
    ExportText,
    TextExported(Result<PathBuf, String>),
    ClearText,

    // Cropper
    PasteImage,
    ImagePasted(Result<RgbaImage, ClipboardError>),
    AspectSelected(AspectRatio),
    FormatSelected(ExportFormat),
    ZoomChanged(f32),
    ZoomDelta(f32),
    Pan(Vector2<f32>),
    CropDragStart { handle: DragHandle, x: f32, y: f32 },
    CropDragMove { x: f32, y: f32 },
    CropDragEnd,
    CopyImage,
    ImageCopied(Result<(), String>),
    ExportImage,
    ImageExported(Result<PathBuf, String>),
    ClearImage,
}

impl ClipPlayground {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        log::info!("📋 Clipboard playground initialized");

        (
            ClipPlayground {
                tool: ActiveTool::Scratchpad,
                scratchpad: ScratchpadState::new(),
                cropper: CropperState::new(),
                status: String::from("Ready."),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ToolSelected(tool) => {
                self.tool = tool;
                Task::none()
            }

            // The global shortcut goes to whichever tool is in front
            Message::PasteShortcut => match self.tool {
                ActiveTool::Scratchpad => self.update(Message::PasteText),
                ActiveTool::Cropper => self.update(Message::PasteImage),
            },

            // ===== Scratchpad =====
            Message::EditorAction(action) => {
                self.scratchpad.apply(action);
                Task::none()
            }
            Message::ToggleLineNumbers => {
                self.scratchpad.show_line_numbers = !self.scratchpad.show_line_numbers;
                Task::none()
            }
            Message::ToggleRelativeNumbers => {
                self.scratchpad.relative_line_numbers = !self.scratchpad.relative_line_numbers;
                Task::none()
            }
            Message::ToggleWordWrap => {
                self.scratchpad.word_wrap = !self.scratchpad.word_wrap;
                Task::none()
            }
            Message::PasteText => Task::perform(clipboard::read_text(), Message::TextPasted),
            Message::TextPasted(Ok(content)) => {
                let count = content.chars().count();
                self.scratchpad.insert_clipboard(content);
                self.status = format!("📋 Pasted {} characters.", count);
                Task::none()
            }
            Message::TextPasted(Err(e)) => self.clipboard_failed(e),
            Message::CopyText => {
                let content = self.scratchpad.text();
                Task::perform(clipboard::write_text(content), Message::TextCopied)
            }
            Message::TextCopied(Ok(())) => {
                self.status = String::from("✅ Copied buffer to clipboard.");
                Task::none()
            }
            Message::TextCopied(Err(e)) => self.clipboard_failed(e),
            Message::ExportText => {
                // Native save dialog, pre-filled with the export filename
                let target = FileDialog::new()
                    .set_title("Export Text")
                    .set_file_name("text-export.txt")
                    .set_directory(default_export_dir())
                    .save_file();

                match target {
                    Some(path) => Task::perform(
                        export_text_async(self.scratchpad.text(), path),
                        Message::TextExported,
                    ),
                    None => Task::none(),
                }
            }
            Message::TextExported(result) => self.export_finished(result),
            Message::ClearText => {
                self.scratchpad.clear();
                self.status = String::from("Scratchpad cleared.");
                Task::none()
            }

            // ===== Cropper =====
            Message::PasteImage => Task::perform(clipboard::read_image(), Message::ImagePasted),
            Message::ImagePasted(Ok(pixels)) => {
                log::info!(
                    "🖼️  Loaded {}x{} clipboard image",
                    pixels.width(),
                    pixels.height()
                );
                self.status = format!(
                    "🖼️ Loaded {}x{} image from clipboard.",
                    pixels.width(),
                    pixels.height()
                );
                self.cropper.install_image(pixels);
                Task::none()
            }
            Message::ImagePasted(Err(e)) => self.clipboard_failed(e),
            Message::AspectSelected(aspect) => {
                self.cropper.set_aspect(aspect);
                Task::none()
            }
            Message::FormatSelected(format) => {
                self.cropper.format = format;
                Task::none()
            }
            Message::ZoomChanged(zoom) => {
                self.cropper.set_zoom(zoom);
                Task::none()
            }
            Message::ZoomDelta(delta) => {
                self.cropper.zoom_by(delta);
                Task::none()
            }
            Message::Pan(delta) => {
                self.cropper.pan_by(delta);
                Task::none()
            }
            Message::CropDragStart { handle, x, y } => {
                if let Some(source) = &self.cropper.source {
                    match handle {
                        DragHandle::None => {
                            let x = x.clamp(0.0, source.width() as f32);
                            let y = y.clamp(0.0, source.height() as f32);
                            self.cropper.selection.start_new_selection(x, y);
                        }
                        handle => self.cropper.selection.start_handle_drag(handle, x, y),
                    }
                }
                Task::none()
            }
            Message::CropDragMove { x, y } => {
                if let Some(source) = &self.cropper.source {
                    let ratio = self.cropper.aspect.ratio();
                    self.cropper.selection.update_drag(
                        x,
                        y,
                        source.width() as f32,
                        source.height() as f32,
                        ratio,
                    );
                }
                Task::none()
            }
            Message::CropDragEnd => {
                self.cropper.selection.end_drag();
                Task::none()
            }
            Message::CopyImage => match self.crop_job() {
                Some((pixels, region, zoom)) => {
                    Task::perform(copy_image_async(pixels, region, zoom), Message::ImageCopied)
                }
                None => self.nothing_to_export(),
            },
            Message::ImageCopied(Ok(())) => {
                self.status = String::from("✅ Cropped image copied to clipboard.");
                Task::none()
            }
            Message::ImageCopied(Err(e)) => {
                log::warn!("copy failed: {}", e);
                self.status = format!("⚠️ {}", e);
                Task::none()
            }
            Message::ExportImage => match self.crop_job() {
                Some((pixels, region, zoom)) => {
                    let format = self.cropper.format;
                    let target = FileDialog::new()
                        .set_title("Export Cropped Image")
                        .set_file_name(format!("cropped-image.{}", format.extension()))
                        .set_directory(default_export_dir())
                        .save_file();

                    match target {
                        Some(path) => Task::perform(
                            export_image_async(pixels, region, zoom, format, path),
                            Message::ImageExported,
                        ),
                        None => Task::none(),
                    }
                }
                None => self.nothing_to_export(),
            },
            Message::ImageExported(result) => self.export_finished(result),
            Message::ClearImage => {
                self.cropper.clear();
                self.status = String::from("Image cleared.");
                Task::none()
            }
        }
    }

    /// Everything a background crop task needs, cloned out of the state
    fn crop_job(&self) -> Option<(RgbaImage, state::selection::CropRect, f32)> {
        let source = self.cropper.source.as_ref()?;
        let region = self.cropper.selection.region?;
        Some((source.pixels.clone(), region, self.cropper.zoom))
    }

    fn nothing_to_export(&mut self) -> Task<Message> {
        self.status = String::from("⚠️ Nothing to export: paste an image first.");
        Task::none()
    }

    fn clipboard_failed(&mut self, error: ClipboardError) -> Task<Message> {
        log::warn!("clipboard operation failed: {}", error);
        self.status = format!("⚠️ {}", error);
        Task::none()
    }

    fn export_finished(&mut self, result: Result<PathBuf, String>) -> Task<Message> {
        match result {
            Ok(path) => {
                log::info!("exported to {}", path.display());
                self.status = format!("✅ Exported to {}", path.display());
            }
            Err(e) => {
                log::error!("export failed: {}", e);
                self.status = format!("⚠️ {}", e);
            }
        }
        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let tabs = row![
            tab_button("To Text", self.tool == ActiveTool::Scratchpad)
                .on_press(Message::ToolSelected(ActiveTool::Scratchpad)),
            tab_button("To Image", self.tool == ActiveTool::Cropper)
                .on_press(Message::ToolSelected(ActiveTool::Cropper)),
        ]
        .spacing(8);

        let content = match self.tool {
            ActiveTool::Scratchpad => ui::scratchpad::view(&self.scratchpad),
            ActiveTool::Cropper => ui::cropper::view(&self.cropper),
        };

        container(
            column![tabs, content, text(&self.status).size(14)]
                .spacing(12)
                .align_x(Alignment::Start),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(16)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Global keyboard shortcuts
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(handle_hotkey)
    }
}

/// Ctrl+V (Cmd+V on macOS) pastes into the active tool when no widget
/// captured the key press
fn handle_hotkey(key: keyboard::Key, modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Character(c) if c == "v" && modifiers.command() => {
            Some(Message::PasteShortcut)
        }
        _ => None,
    }
}

fn tab_button(label: &str, active: bool) -> iced::widget::Button<'_, Message> {
    button(text(label).size(14)).style(if active {
        button::primary
    } else {
        button::secondary
    })
}

/// Default directory offered by the export dialogs
fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Async wrapper: write the scratchpad buffer to disk
async fn export_text_async(content: String, path: PathBuf) -> Result<PathBuf, String> {
    export::encode::export_text(content, path)
        .await
        .map_err(|e| e.to_string())
}

/// Async wrapper: composite, encode, and write the crop to disk
async fn export_image_async(
    pixels: RgbaImage,
    region: state::selection::CropRect,
    zoom: f32,
    format: ExportFormat,
    path: PathBuf,
) -> Result<PathBuf, String> {
    export::encode::export_image(pixels, region, zoom, format, path)
        .await
        .map_err(|e| e.to_string())
}

/// Async wrapper: composite the crop and put it on the clipboard
async fn copy_image_async(
    pixels: RgbaImage,
    region: state::selection::CropRect,
    zoom: f32,
) -> Result<(), String> {
    let composed = export::encode::composed_crop(pixels, region, zoom)
        .await
        .map_err(|e| e.to_string())?;

    clipboard::write_image(composed)
        .await
        .map_err(|e| e.to_string())
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application(
        "Clipboard Playground",
        ClipPlayground::update,
        ClipPlayground::view,
    )
    .theme(ClipPlayground::theme)
    .subscription(ClipPlayground::subscription)
    .centered()
    .run_with(ClipPlayground::new)
}
