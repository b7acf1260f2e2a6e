/// Scratchpad view
///
/// Line-number gutter and editor share one monospace font, text size, and
/// absolute line height, and live side by side in a single scrollable, so the
/// gutter stays vertically aligned with the buffer no matter how far the user
/// scrolls.
use iced::widget::text::{LineHeight, Wrapping};
use iced::widget::{button, column, container, row, scrollable, text, text_editor, Column};
use iced::{Alignment, Color, Element, Font, Length};

use crate::state::scratchpad::{gutter_label, ScratchpadState};
use crate::Message;

const TEXT_SIZE: f32 = 14.0;
/// Shared by the gutter cells and the editor so rows line up
const LINE_HEIGHT: f32 = 21.0;
const GUTTER_WIDTH: f32 = 48.0;

const GUTTER_COLOR: Color = Color::from_rgb(0.45, 0.45, 0.52);
const CURRENT_LINE_COLOR: Color = Color::from_rgb(0.38, 0.62, 1.0);

/// Build the scratchpad tool view
pub fn view(state: &ScratchpadState) -> Element<'_, Message> {
    let toolbar = row![
        text("Clipboard Playground").size(20).font(Font::MONOSPACE),
        iced::widget::horizontal_space(),
        button(if state.show_line_numbers {
            "Hide Numbers"
        } else {
            "Show Numbers"
        })
        .on_press(Message::ToggleLineNumbers),
        button(if state.relative_line_numbers {
            "Absolute Numbers"
        } else {
            "Relative Numbers"
        })
        .on_press(Message::ToggleRelativeNumbers),
        button(if state.word_wrap {
            "Disable Wrap"
        } else {
            "Enable Wrap"
        })
        .on_press(Message::ToggleWordWrap),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let editor = text_editor(&state.content)
        .placeholder("Paste your text here or start typing...")
        .on_action(Message::EditorAction)
        .font(Font::MONOSPACE)
        .size(TEXT_SIZE)
        .line_height(LineHeight::Absolute(LINE_HEIGHT.into()))
        .wrapping(if state.word_wrap {
            Wrapping::Word
        } else {
            Wrapping::None
        })
        .padding(8);

    let buffer_area: Element<'_, Message> = if state.show_line_numbers {
        row![gutter(state), editor].into()
    } else {
        editor.into()
    };

    let stats = row![
        text(format!("Lines: {}", state.stats.lines)).size(TEXT_SIZE),
        text(format!("Words: {}", state.stats.words)).size(TEXT_SIZE),
        text(format!("Characters: {}", state.stats.characters)).size(TEXT_SIZE),
        text(format!("Current Line: {}", state.current_line)).size(TEXT_SIZE),
    ]
    .spacing(16);

    let actions = row![
        button("Paste").on_press(Message::PasteText),
        button("Copy").on_press(Message::CopyText),
        button("Export").on_press(Message::ExportText),
        button("Clear").on_press(Message::ClearText),
    ]
    .spacing(8);

    column![
        toolbar,
        container(scrollable(buffer_area).height(Length::Fill).width(Length::Fill))
            .style(container::bordered_box)
            .height(Length::Fill),
        row![stats, iced::widget::horizontal_space(), actions].align_y(Alignment::Center),
    ]
    .spacing(12)
    .into()
}

/// Line-number column, one cell per buffer line
fn gutter(state: &ScratchpadState) -> Element<'_, Message> {
    let mut cells = Column::new();

    for line in 1..=state.gutter_rows() {
        let is_current = line == state.current_line;
        let label = gutter_label(line, state.current_line, state.relative_line_numbers);

        cells = cells.push(
            text(label.to_string())
                .size(TEXT_SIZE)
                .line_height(LineHeight::Absolute(LINE_HEIGHT.into()))
                .font(Font::MONOSPACE)
                .color(if is_current {
                    CURRENT_LINE_COLOR
                } else {
                    GUTTER_COLOR
                })
                .width(Length::Fill)
                .align_x(Alignment::End),
        );
    }

    // Top padding matches the editor's inner padding
    container(cells)
        .width(Length::Fixed(GUTTER_WIDTH))
        .padding([8.0, 6.0])
        .into()
}
