// ============================================================================
// PAGINATION - Cálculo de ventanas de página ("Showing X to Y of Z")
// ============================================================================

/// Datos derivados para el pie de paginación
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Secuencia completa `1..=total_pages` (sin truncado)
    pub page_numbers: Vec<u32>,
    pub start_item: u32,
    pub end_item: u32,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.end_item == 0
    }
}

/// `start = (page-1)*size + 1`, `end = min(start+size-1, total)`.
/// Sin items no hay rango que mostrar: start y end valen 0.
pub fn windows(current_page: u32, total_pages: u32, total_items: u32, page_size: u32) -> PageWindow {
    let page_numbers: Vec<u32> = (1..=total_pages).collect();
    if total_items == 0 || page_size == 0 {
        return PageWindow { page_numbers, start_item: 0, end_item: 0 };
    }

    let page = current_page.max(1);
    let start_item = (page - 1).saturating_mul(page_size).saturating_add(1);
    let end_item = start_item
        .saturating_add(page_size - 1)
        .min(total_items);

    // Página fuera de rango: se muestra la última ventana válida
    if start_item > total_items {
        let last_page = total_pages_for(total_items, page_size);
        return windows(last_page, total_pages, total_items, page_size);
    }

    PageWindow { page_numbers, start_item, end_item }
}

/// Cambiar a una página fuera de rango o a la misma es un no-op
pub fn is_navigable(current_page: u32, target_page: u32, total_pages: u32) -> bool {
    target_page >= 1 && target_page <= total_pages && target_page != current_page
}

/// `ceil(total / size)`, al menos 1
pub fn total_pages_for(total_items: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn middle_page_window() {
        let window = windows(2, 3, 20, 8);
        assert_eq!(window.page_numbers, vec![1, 2, 3]);
        assert_eq!(window.start_item, 9);
        assert_eq!(window.end_item, 16);
    }

    #[test]
    fn last_page_is_truncated_to_total() {
        let window = windows(3, 3, 20, 8);
        assert_eq!((window.start_item, window.end_item), (17, 20));
    }

    #[test]
    fn empty_list_has_no_range() {
        let window = windows(1, 1, 0, 6);
        assert!(window.is_empty());
        assert_eq!(window.page_numbers, vec![1]);
    }

    #[test]
    fn navigation_guards() {
        assert!(is_navigable(1, 2, 3));
        assert!(!is_navigable(2, 2, 3));
        assert!(!is_navigable(1, 0, 3));
        assert!(!is_navigable(1, 4, 3));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages_for(0, 6), 1);
        assert_eq!(total_pages_for(6, 6), 1);
        assert_eq!(total_pages_for(7, 6), 2);
    }

    proptest! {
        #[test]
        fn window_bounds_hold(total_items in 1u32..500, page_size in 1u32..50, page_seed in 0u32..1000) {
            let total_pages = total_pages_for(total_items, page_size);
            let page = page_seed % total_pages + 1;
            let window = windows(page, total_pages, total_items, page_size);
            prop_assert!(window.start_item <= window.end_item);
            prop_assert!(window.end_item <= total_items);
            prop_assert!(window.end_item - window.start_item < page_size);
            prop_assert_eq!(window.page_numbers.len() as u32, total_pages);
        }
    }
}
