use iced::widget::{button, column, container, mouse_area, row, text};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::page::{CardView, Page};
use crate::Message;

/// Width of one recipe card
const CARD_WIDTH: f32 = 240.0;

/// Star glyph for a favorite button
pub fn star(active: bool) -> &'static str {
    if active {
        "★"
    } else {
        "☆"
    }
}

/// The card grid, visible cards only
pub fn view(page: &Page) -> Element<'_, Message> {
    let cards: Vec<Element<'_, Message>> = page.visible_cards().map(card).collect();

    if cards.is_empty() {
        return container(text("No recipes match your search.").size(16))
            .padding(40)
            .center_x(Length::Fill)
            .into();
    }

    Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0).into()
}

fn card(card: &CardView) -> Element<'_, Message> {
    let favorite = button(text(star(card.favorite)).size(18))
        .on_press(Message::ToggleFavorite(card.id.clone()))
        .style(if card.favorite { button::primary } else { button::secondary });

    let body = column![
        text(&card.id).size(20),
        text(&card.category).size(12),
        text(&card.ingredients).size(13),
        row![
            button("View").on_press(Message::Open(card.id.clone())),
            favorite,
        ]
        .spacing(8),
    ]
    .spacing(8);

    // Clicking the card body opens it too; the buttons capture their own clicks
    mouse_area(
        container(body)
            .padding(12)
            .width(Length::Fixed(CARD_WIDTH))
            .style(container::rounded_box),
    )
    .on_press(Message::Open(card.id.clone()))
    .into()
}
