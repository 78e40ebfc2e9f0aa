//! Localized bot messages.
//!
//! A static catalog in English (default), Russian and Belarusian. The
//! language is picked from the Telegram client's `language_code`; anything
//! unknown falls back to English. `{name}` placeholders are substituted from
//! the arguments passed to [`Translator::translate`].

/// Supported message languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English
    #[default]
    English,
    /// Russian
    Russian,
    /// Belarusian
    Belarusian,
}

impl Language {
    /// Pick a language from an IETF tag such as `ru` or `be-BY`.
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        let primary = code
            .and_then(|code| code.split(['-', '_']).next())
            .map(str::to_ascii_lowercase);

        match primary.as_deref() {
            Some("ru") => Self::Russian,
            Some("be") => Self::Belarusian,
            _ => Self::English,
        }
    }
}

/// Catalog message identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageId {
    /// Greeting with the two action buttons.
    Welcome,
    /// Label of the web app button.
    StartTourButton,
    /// Label of the buy button.
    BuyTicketButton,
    /// Sent after a captured payment. Takes `{code}`.
    PurchaseComplete,
    /// Sent when no price is published.
    PaymentsUnavailable,
    /// Invoice title.
    InvoiceTitle,
    /// Invoice description.
    InvoiceDescription,
    /// Invoice price line label.
    InvoicePriceLabel,
    /// Shown to the payer when pre-checkout rejects the payment.
    CheckoutRejected,
}

/// Message catalog lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator;

impl Translator {
    /// Render `message` in `language`, substituting `{name}` placeholders.
    #[must_use]
    pub fn translate(self, message: MessageId, language: Language, args: &[(&str, &str)]) -> String {
        let mut text = template(message, language).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

fn template(message: MessageId, language: Language) -> &'static str {
    use Language::{Belarusian, English, Russian};
    use MessageId::{
        BuyTicketButton, CheckoutRejected, InvoiceDescription, InvoicePriceLabel, InvoiceTitle,
        PaymentsUnavailable, PurchaseComplete, StartTourButton, Welcome,
    };

    match (message, language) {
        (Welcome, English) => "Let's start the tour! 🎧\nPlease choose an option below to proceed",
        (Welcome, Russian) => "Начнём экскурсию! 🎧\nВыберите один из вариантов ниже",
        (Welcome, Belarusian) => "Пачнем экскурсію! 🎧\nАбярыце адзін з варыянтаў ніжэй",

        (StartTourButton, English) => "Start the tour",
        (StartTourButton, Russian) => "Начать экскурсию",
        (StartTourButton, Belarusian) => "Пачаць экскурсію",

        (BuyTicketButton, English) => "Buy a ticket",
        (BuyTicketButton, Russian) => "Купить билет",
        (BuyTicketButton, Belarusian) => "Купіць білет",

        (PurchaseComplete, English) => {
            "Thank you for your purchase!\nYour ticket number: {code}\nPlease tap the button below to proceed"
        }
        (PurchaseComplete, Russian) => {
            "Спасибо за покупку!\nНомер вашего билета: {code}\nНажмите кнопку ниже, чтобы продолжить"
        }
        (PurchaseComplete, Belarusian) => {
            "Дзякуй за пакупку!\nНумар вашага білета: {code}\nНацісніце кнопку ніжэй, каб працягнуць"
        }

        (PaymentsUnavailable, English) => {
            "Sorry, payments are currently not available. Please try again later."
        }
        (PaymentsUnavailable, Russian) => "Извините, оплата сейчас недоступна. Попробуйте позже.",
        (PaymentsUnavailable, Belarusian) => "Прабачце, аплата зараз недаступная. Паспрабуйце пазней.",

        (InvoiceTitle, English) => "Tour ticket",
        (InvoiceTitle, Russian) => "Билет на экскурсию",
        (InvoiceTitle, Belarusian) => "Білет на экскурсію",

        (InvoiceDescription, English) => "Ticket that allows to start the tour",
        (InvoiceDescription, Russian) => "Билет, который позволяет начать экскурсию",
        (InvoiceDescription, Belarusian) => "Білет, які дазваляе пачаць экскурсію",

        (InvoicePriceLabel, English) => "Price",
        (InvoicePriceLabel, Russian) => "Цена",
        (InvoicePriceLabel, Belarusian) => "Кошт",

        (CheckoutRejected, English) => {
            "This invoice is no longer valid. Please request a new ticket."
        }
        (CheckoutRejected, Russian) => "Этот счёт больше недействителен. Запросите новый билет.",
        (CheckoutRejected, Belarusian) => "Гэты рахунак больш не дзейнічае. Запытайце новы білет.",
    }
}
