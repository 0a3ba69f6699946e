// ============================================================================
// SEARCH - Evaluador de búsqueda libre (función pura)
// ============================================================================

use std::collections::BTreeMap;

use crate::models::resource::Resource;

/// Items cuyo algún campo de búsqueda contiene `term` (sin distinguir mayúsculas).
/// Un término vacío o de solo espacios devuelve los items sin cambios.
pub fn evaluate<R: Resource>(items: &[R], term: &str) -> Vec<R> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matches(*item, &needle))
        .cloned()
        .collect()
}

/// `needle` ya viene recortado y en minúsculas
pub fn matches<R: Resource>(item: &R, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Filtros exactos (`role = admin`, `status = active`). Valor vacío = sin filtro.
pub fn apply_filters<R: Resource>(items: Vec<R>, filters: &BTreeMap<String, String>) -> Vec<R> {
    let active: Vec<(&String, &String)> = filters.iter().filter(|(_, v)| !v.is_empty()).collect();
    if active.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            active
                .iter()
                .all(|(key, value)| item.attribute(key) == Some(value.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mall;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn mall(id: &str, name: &str, location: &str) -> Mall {
        Mall {
            id: id.to_string(),
            name: name.to_string(),
            location: Some(location.to_string()),
            ..Mall::default()
        }
    }

    #[test]
    fn matches_name_case_insensitively() {
        let items = vec![mall("1", "City Center", "Downtown"), mall("2", "Plaza", "Uptown")];
        let found = evaluate(&items, "city");
        assert_eq!(found, vec![items[0].clone()]);
    }

    #[test]
    fn matches_secondary_fields() {
        let items = vec![mall("1", "City Center", "Downtown"), mall("2", "Plaza", "Uptown")];
        let found = evaluate(&items, "UPTOWN");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");
    }

    #[test]
    fn blank_term_is_identity() {
        let items = vec![mall("1", "City Center", "Downtown")];
        assert_eq!(evaluate(&items, ""), items);
        assert_eq!(evaluate(&items, "   "), items);
    }

    #[test]
    fn exact_filters_combine() {
        use crate::models::User;
        let user = |id: &str, role: &str, status: &str| User {
            id: id.into(),
            role: role.into(),
            status: Some(status.into()),
            ..User::default()
        };
        let users = vec![user("1", "admin", "active"), user("2", "user", "active"), user("3", "admin", "blocked")];
        let mut filters = BTreeMap::new();
        filters.insert("role".to_string(), "admin".to_string());
        filters.insert("status".to_string(), "".to_string());
        assert_eq!(apply_filters(users.clone(), &filters).len(), 2);
        filters.insert("status".to_string(), "blocked".to_string());
        let ids: Vec<String> = apply_filters(users, &filters).into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["3".to_string()]);
    }

    fn arb_malls() -> impl Strategy<Value = Vec<Mall>> {
        prop::collection::vec(("[a-zA-Z ]{0,12}", "[a-zA-Z ]{0,12}"), 0..20).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, location))| mall(&i.to_string(), &name, &location))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn result_is_subset_of_input(items in arb_malls(), term in "[a-zA-Z ]{0,4}") {
            let found = evaluate(&items, &term);
            prop_assert!(found.len() <= items.len());
            for item in &found {
                prop_assert!(items.contains(item));
            }
        }

        #[test]
        fn evaluate_is_idempotent(items in arb_malls(), term in "[a-zA-Z ]{0,4}") {
            let once = evaluate(&items, &term);
            let twice = evaluate(&once, &term);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn empty_term_returns_everything(items in arb_malls()) {
            prop_assert_eq!(evaluate(&items, ""), items);
        }
    }
}
