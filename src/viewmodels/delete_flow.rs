// ============================================================================
// DELETE FLOW - Confirmación en dos pasos antes de borrar
// ============================================================================

/// `Armed` (nada pendiente) o `Pending(item)` esperando confirmación.
/// La llamada de borrado solo sale de `take()`, que siempre vuelve a `Armed`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteFlow<R> {
    Armed,
    Pending(R),
}

impl<R> Default for DeleteFlow<R> {
    fn default() -> Self {
        DeleteFlow::Armed
    }
}

impl<R> DeleteFlow<R> {
    /// Guardar el candidato; sin efectos de red
    pub fn request(&mut self, item: R) {
        *self = DeleteFlow::Pending(item);
    }

    /// Descartar el candidato
    pub fn cancel(&mut self) -> Option<R> {
        self.take()
    }

    /// Confirmar: entrega el candidato y rearma
    pub fn take(&mut self) -> Option<R> {
        match std::mem::take(self) {
            DeleteFlow::Pending(item) => Some(item),
            DeleteFlow::Armed => None,
        }
    }

    pub fn pending(&self) -> Option<&R> {
        match self {
            DeleteFlow::Pending(item) => Some(item),
            DeleteFlow::Armed => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DeleteFlow::Pending(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_then_take_rearms() {
        let mut flow = DeleteFlow::Armed;
        flow.request("m1");
        assert_eq!(flow.pending(), Some(&"m1"));
        assert_eq!(flow.take(), Some("m1"));
        assert_eq!(flow, DeleteFlow::Armed);
    }

    #[test]
    fn cancel_discards_candidate() {
        let mut flow = DeleteFlow::Armed;
        flow.request("m1");
        flow.cancel();
        assert!(!flow.is_pending());
        assert_eq!(flow.take(), None);
    }

    #[test]
    fn new_request_replaces_candidate() {
        let mut flow = DeleteFlow::Armed;
        flow.request("m1");
        flow.request("m2");
        assert_eq!(flow.take(), Some("m2"));
    }
}
