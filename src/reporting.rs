use crate::types::inventory::{Item, Stats};

pub fn stats(items: &[Item]) -> Stats {
    let total = items.len();
    let lent = items.iter().filter(|item| item.lent).count();
    Stats {
        total,
        lent,
        available: total - lent,
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn stats__should_be_zero_for_empty_catalog() {
        // Then
        assert_eq!(stats(&[]), Stats::default());
    }

    #[test]
    fn stats__should_count_lent_and_available() {
        // Given
        let items: Vec<Item> = (1..=5)
            .map(|id| Item {
                id,
                name: format!("Casco {id}"),
                capacity: 1,
                lent: id % 2 == 0,
                borrower: (id % 2 == 0).then_some(1),
            })
            .collect();

        // When
        let stats = stats(&items);

        // Then
        assert_eq!(stats.total, 5);
        assert_eq!(stats.lent, 2);
        assert_eq!(stats.available, 3);
        assert_eq!(stats.lent + stats.available, stats.total);
    }
}
