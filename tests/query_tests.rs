use esim_plans_bot::callback_data::CallbackData;
use esim_plans_bot::catalog::{Catalog, Plan};
use esim_plans_bot::errors::LookupError;
use esim_plans_bot::query::{answer, AnswerLimits};

fn plan(country: &str, name: &str, price: &str) -> Plan {
    Plan {
        continent: "Asia".to_string(),
        country: country.to_string(),
        plan_name: name.to_string(),
        data_allowance: "5GB".to_string(),
        validity: "7 days".to_string(),
        price: price.to_string(),
        ..Default::default()
    }
}

fn japan_catalog(count: usize) -> Catalog {
    (0..count)
        .map(|i| plan("Japan", &format!("Japan {i}"), &format!("${}", 20 - i)))
        .collect()
}

#[test]
fn test_country_answer_paginates() {
    let catalog = japan_catalog(7);

    let result = answer(&catalog, "japan", AnswerLimits::default()).unwrap();

    assert_eq!(result.plans.len(), 5);
    assert_eq!(result.total, 7);
    assert_eq!(
        result.next,
        Some(CallbackData::CountryPage {
            country: "Japan".to_string(),
            offset: 5
        })
    );
}

#[test]
fn test_country_answer_single_page() {
    let catalog = japan_catalog(3);
    let result = answer(&catalog, "Japan", AnswerLimits::default()).unwrap();
    assert_eq!(result.plans.len(), 3);
    assert!(result.next.is_none());
}

#[test]
fn test_alias_answer() {
    let catalog: Catalog = vec![plan("United States Of America", "USA 5GB", "$5")]
        .into_iter()
        .collect();

    let result = answer(&catalog, "USA", AnswerLimits::default()).unwrap();
    assert_eq!(result.plans[0].plan_name, "USA 5GB");
}

#[test]
fn test_cheapest_answer() {
    let catalog = japan_catalog(8);

    let result = answer(&catalog, "cheapest jpan", AnswerLimits::default()).unwrap();

    let prices: Vec<&str> = result.plans.iter().map(|p| p.price.as_str()).collect();
    assert_eq!(prices, vec!["$13", "$14", "$15", "$16", "$17"]);
    assert!(result.next.is_none());
}

#[test]
fn test_filter_answer_carries_token() {
    let catalog = japan_catalog(8);

    let result = answer(&catalog, "price > 13", AnswerLimits::default()).unwrap();

    assert_eq!(result.total, 7);
    match result.next {
        Some(CallbackData::FilterPage { filter, offset }) => {
            assert_eq!(offset, 5);
            assert_eq!(filter.to_string(), "price>13");
        }
        other => panic!("Unexpected token: {other:?}"),
    }
}

#[test]
fn test_not_found_and_invalid_filter_are_distinct() {
    let catalog = japan_catalog(2);

    assert!(matches!(
        answer(&catalog, "Xyzzyland", AnswerLimits::default()),
        Err(LookupError::NotFound { .. })
    ));
    assert!(matches!(
        answer(&catalog, "price < 1", AnswerLimits::default()),
        Err(LookupError::NotFound { .. })
    ));
    assert!(matches!(
        answer(&catalog, "price < a lot", AnswerLimits::default()),
        Err(LookupError::UnparseableFilter { .. })
    ));
}

#[test]
fn test_custom_limits() {
    let catalog = japan_catalog(12);
    let limits = AnswerLimits {
        page_size: 10,
        cheapest_limit: 2,
    };

    assert_eq!(answer(&catalog, "japan", limits).unwrap().plans.len(), 10);
    assert_eq!(answer(&catalog, "cheapest japan", limits).unwrap().plans.len(), 2);
}
