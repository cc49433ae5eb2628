//! WhatsApp reservation links for the excursion detail page.

use chrono::NaiveDate;
use listing::parse_price;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Message used when the site settings carry no template.
pub const DEFAULT_TEMPLATE: &str = "Hola, quiero reservar [NombreExcursion] para [cantidadPersonas] personas el [Fecha]. Mi nombre es [NombrePersona].";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReservationError {
    #[error("whatsapp number '{0}' contains no digits")]
    MissingNumber(String),
    #[error("a reservation needs at least one person")]
    NoPeople,
}

/// Characters escaped by JavaScript's `encodeURIComponent`, which is what
/// WhatsApp clients expect in the `text` parameter.
const MESSAGE_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub excursion_title: String,
    pub price: String,
    pub guest_name: String,
    pub date: NaiveDate,
    pub people: u32,
}

/// Fills the template. Each placeholder is replaced once, at its first
/// occurrence; an empty template falls back to [`DEFAULT_TEMPLATE`].
pub fn reservation_message(template: &str, request: &ReservationRequest) -> String {
    let template = if template.trim().is_empty() {
        DEFAULT_TEMPLATE
    } else {
        template
    };
    let people = request.people.to_string();
    let date = request.date.format("%Y-%m-%d").to_string();

    [
        ("[NombreExcursion]", request.excursion_title.as_str()),
        ("[cantidadPersonas]", people.as_str()),
        ("[NombrePersona]", request.guest_name.as_str()),
        ("[Fecha]", date.as_str()),
        ("[precio]", request.price.as_str()),
    ]
    .into_iter()
    .fold(template.to_string(), |message, (placeholder, value)| {
        message.replacen(placeholder, value, 1)
    })
}

/// `https://wa.me/<digits>?text=<message>` for the configured number.
pub fn whatsapp_link(number: &str, message: &str) -> Result<String, ReservationError> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ReservationError::MissingNumber(number.to_string()));
    }

    let text = utf8_percent_encode(message, MESSAGE_ESCAPES);
    Ok(format!("https://wa.me/{digits}?text={text}"))
}

/// Builds the full reservation link from settings and the guest's input.
pub fn reservation_link(
    number: &str,
    template: &str,
    request: &ReservationRequest,
) -> Result<String, ReservationError> {
    if request.people == 0 {
        return Err(ReservationError::NoPeople);
    }
    whatsapp_link(number, &reservation_message(template, request))
}

/// Price per person times the party size, when the price is numeric.
pub fn estimated_total(price: &str, people: u32) -> Option<f64> {
    parse_price(price).map(|unit| unit * f64::from(people))
}

#[cfg(test)]
#[path = "tests/reservation_tests.rs"]
mod tests;
