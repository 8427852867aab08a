//! MovementBlockers - общий набор токенов, блокирующих locomotion
//!
//! Пишут: AttackLifecycle (activate/deactivate) и сам movement.
//! Читает: MovementState (Move/Jump игнорируются пока набор не пуст).
//!
//! Хранится как multiset: один и тот же токен может лежать несколько раз,
//! remove убирает ровно одно вхождение.

/// Токены, блокирующие движение (атаки используют свой id как токен).
///
/// Инвариант: `is_blocked() == !tokens.is_empty()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementBlockers {
    tokens: Vec<String>,
    /// Растёт на каждый add (MovementState по нему замечает новый блок и гасит скорость)
    generation: u64,
}

impl MovementBlockers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует токен. Пустая строка - валидный токен.
    pub fn add(&mut self, token: &str) {
        self.tokens.push(token.to_owned());
        self.generation += 1;
    }

    /// Убирает одно вхождение токена. Возвращает false если токена не было.
    pub fn remove(&mut self, token: &str) -> bool {
        let Some(index) = self.tokens.iter().position(|t| t == token) else {
            return false;
        };
        self.tokens.remove(index);
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn is_blocked(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_still_blocks() {
        let mut blockers = MovementBlockers::new();
        assert!(!blockers.is_blocked());

        blockers.add("");
        assert!(blockers.is_blocked());
        assert_eq!(blockers.len(), 1);

        assert!(blockers.remove(""));
        assert!(!blockers.is_blocked());
    }

    #[test]
    fn test_remove_takes_exactly_one_occurrence() {
        let mut blockers = MovementBlockers::new();
        blockers.add("slash");
        blockers.add("slash");
        blockers.add("stun");
        assert_eq!(blockers.len(), 3);

        assert!(blockers.remove("slash"));
        assert_eq!(blockers.len(), 2);
        assert!(blockers.contains("slash"));
        assert!(blockers.contains("stun"));
    }

    #[test]
    fn test_remove_unknown_token_is_noop() {
        let mut blockers = MovementBlockers::new();
        blockers.add("slash");

        assert!(!blockers.remove("kick"));
        assert_eq!(blockers.len(), 1);
    }

    #[test]
    fn test_generation_counts_adds_only() {
        let mut blockers = MovementBlockers::new();
        blockers.add("a");
        blockers.add("b");
        blockers.remove("a");
        assert_eq!(blockers.generation(), 2);
    }
}
