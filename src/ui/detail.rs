use iced::widget::{button, column, container, image, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};
use std::path::Path;

use recipe_book::sync::{DetailView, ImageSlot};

use super::grid::star;
use crate::Message;

const IMAGE_HEIGHT: f32 = 220.0;

pub fn view(detail: &DetailView) -> Element<'_, Message> {
    let header = row![
        text(&detail.title).size(32).width(Length::Fill),
        button(text(star(detail.favorite)).size(20))
            .on_press(Message::DetailFavorite)
            .style(if detail.favorite { button::primary } else { button::secondary }),
        button("Close").on_press(Message::Dismiss),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let ingredients = detail
        .ingredients
        .iter()
        .fold(Column::new().spacing(4), |list, ingredient| {
            list.push(text(format!("• {ingredient}")))
        });

    let navigation = row![
        button("Previous").on_press_maybe(detail.previous_enabled.then_some(Message::Previous)),
        button("Next").on_press_maybe(detail.next_enabled.then_some(Message::Next)),
        button("Show all steps").on_press(Message::ShowAll),
    ]
    .spacing(10);

    let content = column![
        header,
        picture(&detail.image),
        text("Ingredients").size(20),
        ingredients,
        text(&detail.counter).size(18),
        text(&detail.step_text).size(16),
        navigation,
    ]
    .spacing(16)
    .padding(24);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// The recipe photo, or a placeholder when there is none on disk
fn picture(slot: &ImageSlot) -> Element<'_, Message> {
    match slot {
        ImageSlot::Image(path) if Path::new(path).exists() => image(image::Handle::from_path(path))
            .height(Length::Fixed(IMAGE_HEIGHT))
            .into(),
        _ => container(text("No image"))
            .height(Length::Fixed(IMAGE_HEIGHT))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fixed(IMAGE_HEIGHT))
            .style(container::rounded_box)
            .into(),
    }
}
