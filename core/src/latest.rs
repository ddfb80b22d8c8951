use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Billett for én analysekjøring. Høyere id = startet senere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Siste-skriving-vinner: bare resultatet fra den sist *startede* kjøringen
/// slippes gjennom. Eldre resultater som kommer sent forkastes, de flettes aldri.
#[derive(Debug)]
pub struct LatestResult<T> {
    started: AtomicU64,
    published: Mutex<Option<(u64, T)>>,
}

impl<T: Clone> Default for LatestResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> LatestResult<T> {
    pub fn new() -> Self {
        Self {
            started: AtomicU64::new(0),
            published: Mutex::new(None),
        }
    }

    /// Registrerer en ny kjøring; alle tidligere billetter blir utdaterte.
    pub fn begin(&self) -> RunTicket {
        let _slot = match self.published.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        RunTicket(self.started.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.started.load(Ordering::SeqCst) == ticket.0
    }

    /// Publiserer `value` hvis billetten fortsatt er den nyeste. Returnerer om den ble tatt imot.
    pub fn publish(&self, ticket: RunTicket, value: T) -> bool {
        // begin() tar samme lås, så ingen ny kjøring kan starte mellom sjekk og skriving
        let mut slot = match self.published.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !self.is_current(ticket) {
            log::debug!("dropping stale result from run {}", ticket.0);
            return false;
        }
        *slot = Some((ticket.0, value));
        true
    }

    /// Sist publiserte resultat.
    pub fn latest(&self) -> Option<T> {
        let slot = match self.published.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.as_ref().map(|(_, v)| v.clone())
    }

    /// Id til kjøringen som produserte `latest()`.
    pub fn latest_run(&self) -> Option<u64> {
        let slot = match self.published.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.as_ref().map(|(id, _)| *id)
    }
}
