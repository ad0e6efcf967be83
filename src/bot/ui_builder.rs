//! UI Builder module for creating keyboards and formatting messages

use std::collections::BTreeSet;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::callback_data::CallbackData;
use crate::catalog::Plan;

/// Format a plan as the text of a plan card
pub fn format_plan_card(plan: &Plan, language_code: Option<&str>) -> String {
    t_args_lang(
        "plan-card",
        &[
            ("provider", plan.provider.as_str()),
            ("plan", plan.plan_name.as_str()),
            ("data", plan.data_allowance.as_str()),
            ("validity", plan.validity.as_str()),
            ("price", plan.price.as_str()),
        ],
        language_code,
    )
}

/// "Buy Now" keyboard for a plan card, or `None` if the link is not a valid URL
pub fn create_plan_keyboard(plan: &Plan, language_code: Option<&str>) -> Option<InlineKeyboardMarkup> {
    match reqwest::Url::parse(plan.purchase_link.trim()) {
        Ok(url) => Some(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            t_lang("buy-now-button", language_code),
            url,
        )]])),
        Err(e) => {
            warn!(plan = %plan.plan_name, link = %plan.purchase_link, error = %e, "Plan has no usable purchase link");
            None
        }
    }
}

/// One button per continent
pub fn create_continent_keyboard(continents: &BTreeSet<String>) -> InlineKeyboardMarkup {
    let buttons = continents
        .iter()
        .filter_map(|continent| {
            let data = CallbackData::Continent(continent.clone()).encode()?;
            Some(vec![InlineKeyboardButton::callback(continent.clone(), data)])
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}

/// One button per country, each opening the first page of its plans
pub fn create_country_keyboard(countries: &BTreeSet<String>) -> InlineKeyboardMarkup {
    let buttons = countries
        .iter()
        .filter_map(|country| {
            let data = CallbackData::CountryPage {
                country: country.clone(),
                offset: 0,
            }
            .encode()?;
            Some(vec![InlineKeyboardButton::callback(country.clone(), data)])
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}

/// "More" button carrying the next page's token
pub fn create_more_keyboard(next: &CallbackData, language_code: Option<&str>) -> Option<InlineKeyboardMarkup> {
    let Some(data) = next.encode() else {
        warn!(token = %next, "Pagination token too long for a button");
        return None;
    };

    Some(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        t_lang("more-button", language_code),
        data,
    )]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn plan(link: &str) -> Plan {
        Plan {
            country: "Japan".to_string(),
            provider: "Airalo".to_string(),
            plan_name: "Moshi Moshi".to_string(),
            data_allowance: "5GB".to_string(),
            validity: "7 days".to_string(),
            price: "$8".to_string(),
            purchase_link: link.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_keyboard_requires_valid_url() {
        assert!(create_plan_keyboard(&plan("https://example.com/buy"), None).is_some());
        assert!(create_plan_keyboard(&plan("not a link"), None).is_none());
    }

    #[test]
    fn test_country_keyboard_payloads() {
        let countries: BTreeSet<String> = ["Japan", "Thailand"].iter().map(|s| s.to_string()).collect();
        let keyboard = create_country_keyboard(&countries);

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        match &keyboard.inline_keyboard[0][0].kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "country:0:Japan"),
            other => panic!("Unexpected button kind: {other:?}"),
        }
    }
}
