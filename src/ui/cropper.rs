/// Cropper view
///
/// Control bar (paste, aspect preset, output format), the interactive crop
/// canvas, and the zoom/action row. Everything except the paste button and
/// the pick lists stays hidden until an image is loaded.
use iced::widget::{button, canvas, column, container, pick_list, row, slider, text};
use iced::{Alignment, Element, Font, Length};

use crate::state::cropper::{AspectRatio, CropperState, ExportFormat, MAX_ZOOM, MIN_ZOOM};
use crate::ui::crop_canvas::CropCanvas;
use crate::Message;

const TEXT_SIZE: f32 = 14.0;

/// Build the image crop tool view
pub fn view(state: &CropperState) -> Element<'_, Message> {
    let toolbar = row![
        text("Clipboard to Image Playground")
            .size(20)
            .font(Font::MONOSPACE),
        iced::widget::horizontal_space(),
        button("Paste").on_press(Message::PasteImage),
        text("Aspect:").size(TEXT_SIZE),
        pick_list(AspectRatio::ALL, Some(state.aspect), Message::AspectSelected)
            .text_size(TEXT_SIZE),
        text("Format:").size(TEXT_SIZE),
        pick_list(ExportFormat::ALL, Some(state.format), Message::FormatSelected)
            .text_size(TEXT_SIZE),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let stage: Element<'_, Message> = match &state.source {
        Some(source) => canvas(CropCanvas::new(
            source,
            &state.selection,
            state.zoom,
            state.pan,
        ))
        .width(Length::Fill)
        .height(Length::Fill)
        .into(),
        None => container(
            text("Paste an image from your clipboard or press Ctrl+V.").size(TEXT_SIZE),
        )
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into(),
    };

    let mut controls = row![].spacing(8).align_y(Alignment::Center);
    if state.source.is_some() {
        controls = controls
            .push(text("Zoom:").size(TEXT_SIZE))
            .push(
                slider(MIN_ZOOM..=MAX_ZOOM, state.zoom, Message::ZoomChanged)
                    .step(0.1)
                    .width(Length::Fixed(220.0)),
            )
            .push(text(format!("{:.0}%", state.zoom * 100.0)).size(TEXT_SIZE))
            .push(iced::widget::horizontal_space())
            .push(button("Copy").on_press(Message::CopyImage))
            .push(button("Export").on_press(Message::ExportImage))
            .push(button("Clear").on_press(Message::ClearImage));
    }

    column![
        toolbar,
        container(stage)
            .style(container::bordered_box)
            .width(Length::Fill)
            .height(Length::Fill),
        controls,
    ]
    .spacing(12)
    .into()
}
