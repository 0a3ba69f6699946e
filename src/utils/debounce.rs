// ============================================================================
// DEBOUNCE - Una evaluación por periodo de calma
// ============================================================================
// `DebounceGate` es la lógica pura (testeable fuera del navegador).
// `Debouncer` la conecta con un `Timeout` de gloo_timers.
// ============================================================================

use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

/// Estado del debounce: última emisión + generación en curso
#[derive(Debug, Clone)]
pub struct DebounceGate {
    last_emitted: String,
    generation: u64,
}

impl DebounceGate {
    /// El valor de montaje cuenta como ya emitido: nunca dispara por sí solo
    pub fn new(mount_value: &str) -> Self {
        Self {
            last_emitted: mount_value.to_string(),
            generation: 0,
        }
    }

    /// Registrar una pulsación; invalida cualquier ticket anterior
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// `true` si el ticket es el más reciente y el valor cambió desde la última emisión
    pub fn complete(&mut self, ticket: u64, value: &str) -> bool {
        if ticket != self.generation || value == self.last_emitted {
            return false;
        }
        self.last_emitted = value.to_string();
        true
    }

    pub fn last_emitted(&self) -> &str {
        &self.last_emitted
    }
}

/// Debounce de entrada de texto sobre `Timeout`
#[derive(Clone)]
pub struct Debouncer {
    delay_ms: u32,
    gate: Rc<RefCell<DebounceGate>>,
    // Soltar el Timeout anterior lo cancela
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32, mount_value: &str) -> Self {
        Self {
            delay_ms,
            gate: Rc::new(RefCell::new(DebounceGate::new(mount_value))),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// Programar `callback(value)` tras `delay_ms` sin nuevas llamadas
    pub fn call<F>(&self, value: String, callback: F)
    where
        F: FnOnce(String) + 'static,
    {
        let ticket = self.gate.borrow_mut().begin();
        let gate = self.gate.clone();
        let timeout = Timeout::new(self.delay_ms, move || {
            let fire = gate.borrow_mut().complete(ticket, &value);
            if fire {
                callback(value);
            }
        });
        *self.pending.borrow_mut() = Some(timeout);
    }

    /// Cancelar la evaluación pendiente (al desmontar la vista)
    pub fn cancel(&self) {
        self.gate.borrow_mut().begin();
        self.pending.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_value_never_fires() {
        let mut gate = DebounceGate::new("");
        let ticket = gate.begin();
        assert!(!gate.complete(ticket, ""));
    }

    #[test]
    fn only_latest_keystroke_fires() {
        let mut gate = DebounceGate::new("");
        let first = gate.begin();
        let second = gate.begin();
        assert!(!gate.complete(first, "ci"));
        assert!(gate.complete(second, "city"));
        assert_eq!(gate.last_emitted(), "city");
    }

    #[test]
    fn clearing_after_emission_fires_again() {
        let mut gate = DebounceGate::new("");
        let ticket = gate.begin();
        assert!(gate.complete(ticket, "plaza"));
        let ticket = gate.begin();
        assert!(gate.complete(ticket, ""));
    }

    #[test]
    fn unchanged_value_is_not_reemitted() {
        let mut gate = DebounceGate::new("mall");
        let ticket = gate.begin();
        assert!(!gate.complete(ticket, "mall"));
    }
}
