use serde::{Serialize, Deserialize};

use crate::core::{Amount, Entry, Identity, LedgerError, LedgerResult, Payout, ValueTransfer};

/// Single-owner custody ledger. Anyone may deposit; only the owner
/// may withdraw, to a recipient of their choosing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    owner: Identity,
    held_balance: Amount,
    journal: Vec<Entry>
}

impl Ledger {
    pub const CONSISTENCY_CHECK_INTERVAL: usize = 100;

    /// Creates a ledger owned by `caller` holding nothing.
    pub fn initialize(caller: &Identity) -> Ledger {
        log::info!("ledger initialized, owner {}", caller);
        return Ledger { owner: caller.clone(), held_balance: Amount::ZERO, journal: Vec::new() };
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn balance_of(&self) -> Amount {
        self.held_balance
    }

    pub fn history(&self) -> &[Entry] {
        &self.journal
    }

    pub fn deposit(&mut self, caller: &Identity, amount: Amount) -> LedgerResult<()> {
        let new_balance = self.held_balance.checked_add(amount)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{} overflows held balance", amount)))?;

        self.check_if_due()?;
        self.commit(new_balance, Entry::deposit(caller, amount));
        log::info!("deposit of {} wei from {}, held {} wei", amount, caller, self.held_balance);
        return Ok(());
    }

    /// Withdraws `amount` to `recipient`. The caller must be the owner;
    /// that is checked before the balance. The decrement is reserved,
    /// handed to `transfer`, and only committed once the transfer succeeds.
    pub fn withdraw<T: ValueTransfer>(&mut self, caller: &Identity, recipient: &Identity,
                                      amount: Amount, transfer: &mut T) -> LedgerResult<Payout> {
        let reserved = self.reserve(caller, amount)?;
        let payout = transfer.transfer(recipient, amount)
            .map_err(|err| {
                log::error!("transfer of {} wei to {} failed: {}", amount, recipient, err);
                LedgerError::TransferFailed { recipient: recipient.clone(), reason: err.to_string() }
            })?;

        self.commit(reserved, Entry::withdrawal(caller, recipient, amount));
        log::info!("withdrawal of {} wei to {}, held {} wei", amount, recipient, self.held_balance);
        return Ok(payout);
    }

    /// Applies the same checks and decrement as `withdraw` without moving
    /// any value. For callers that must persist the decrement before
    /// paying out.
    pub fn debit(&mut self, caller: &Identity, recipient: &Identity, amount: Amount) -> LedgerResult<()> {
        let reserved = self.reserve(caller, amount)?;
        self.commit(reserved, Entry::withdrawal(caller, recipient, amount));
        log::info!("debited {} wei for {}, held {} wei", amount, recipient, self.held_balance);
        Ok(())
    }

    /// Authorization first, then sufficiency. Returns the balance left
    /// after taking `amount`.
    fn reserve(&self, caller: &Identity, amount: Amount) -> LedgerResult<Amount> {
        self.authorize(caller)?;

        let reserved = self.held_balance.checked_sub(amount)
            .ok_or_else(|| {
                log::warn!("withdrawal of {} wei refused, held {} wei", amount, self.held_balance);
                LedgerError::InsufficientFunds { requested: amount, available: self.held_balance }
            })?;

        self.check_if_due()?;
        Ok(reserved)
    }

    fn authorize(&self, caller: &Identity) -> LedgerResult<()> {
        if *caller != self.owner {
            log::warn!("withdrawal attempted by non-owner {}", caller);
            return Err(LedgerError::Unauthorized { caller: caller.clone() });
        }
        Ok(())
    }

    fn commit(&mut self, new_balance: Amount, entry: Entry) {
        self.held_balance = new_balance;
        self.journal.push(entry);
    }

    /// Replays the journal from zero and compares with the held balance.
    pub fn consistency_check(&self) -> LedgerResult<()> {
        let replayed = self.journal.iter()
            .try_fold(Amount::ZERO, |balance, entry| entry.apply_to(balance));

        if replayed != Some(self.held_balance) {
            log::error!("held balance {} wei does not match journal replay {:?}", self.held_balance, replayed);
            return Err(LedgerError::Inconsistent { recorded: self.held_balance, replayed });
        }
        Ok(())
    }

    /// Every `CONSISTENCY_CHECK_INTERVAL`-th entry is only appended
    /// once the journal so far replays to the held balance.
    fn check_if_due(&self) -> LedgerResult<()> {
        if (self.journal.len() + 1) % Self::CONSISTENCY_CHECK_INTERVAL == 0 {
            self.consistency_check()?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use crate::core::{Amount, Entry, Identity, Ledger, LedgerError};
    use crate::core::transfer::RecordingTransfer;
    use rstest::{fixture, rstest};

    const ONE: Amount = Amount::from_wei(1_000_000_000_000_000_000);
    const TWO: Amount = Amount::from_wei(2_000_000_000_000_000_000);

    #[fixture]
    fn owner() -> Identity {
        Identity::new("0xOwner")
    }

    #[fixture]
    fn stranger() -> Identity {
        Identity::new("0xStranger")
    }

    #[fixture]
    fn funded(owner: Identity, stranger: Identity) -> Ledger {
        let mut ledger = Ledger::initialize(&owner);
        ledger.deposit(&stranger, ONE).unwrap();
        ledger
    }

    #[rstest]
    fn initialize_sets_owner_and_zero_balance(owner: Identity) {
        let ledger = Ledger::initialize(&owner);
        assert_eq!(ledger.owner(), &owner);
        assert_eq!(ledger.balance_of(), Amount::ZERO);
        assert!(ledger.history().is_empty());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(1_000_000_000_000_000_000)]
    #[case(u128::MAX)]
    fn deposit_is_reflected_in_balance(owner: Identity, stranger: Identity, #[case] wei: u128) {
        let mut ledger = Ledger::initialize(&owner);
        ledger.deposit(&stranger, Amount::from_wei(wei)).unwrap();
        assert_eq!(ledger.balance_of(), Amount::from_wei(wei));
    }

    #[rstest]
    fn deposits_accumulate(owner: Identity, stranger: Identity) {
        let mut ledger = Ledger::initialize(&owner);
        let deposits = [3u128, 0, 17, 1_000, 42];
        for wei in deposits {
            ledger.deposit(&stranger, Amount::from_wei(wei)).unwrap();
        }
        assert_eq!(ledger.balance_of(), Amount::from_wei(deposits.iter().sum()));
        assert_eq!(ledger.history().len(), deposits.len());
    }

    #[rstest]
    fn deposit_overflow_rejected(funded: Ledger, stranger: Identity) {
        let mut ledger = funded;
        let res = ledger.deposit(&stranger, Amount::from_wei(u128::MAX));
        assert!(matches!(res, Err(LedgerError::InvalidAmount(..))));
        assert_eq!(ledger.balance_of(), ONE);
        assert_eq!(ledger.history().len(), 1);
    }

    #[rstest]
    fn owner_withdraws_everything(funded: Ledger, owner: Identity) {
        let mut ledger = funded;
        let mut transfer = RecordingTransfer::new();

        ledger.withdraw(&owner, &owner, ONE, &mut transfer).unwrap();

        assert_eq!(ledger.balance_of(), Amount::ZERO);
        assert_eq!(transfer.payouts.len(), 1);
        assert_eq!(transfer.payouts[0].recipient, owner);
        assert_eq!(transfer.payouts[0].amount, ONE);
    }

    #[rstest]
    fn owner_withdraws_to_third_party(funded: Ledger, owner: Identity) {
        let mut ledger = funded;
        let mut transfer = RecordingTransfer::new();
        let frodo = Identity::new("Frodo");
        let quarter = Amount::from_wei(250_000_000_000_000_000);

        let payout = ledger.withdraw(&owner, &frodo, quarter, &mut transfer).unwrap();

        assert_eq!(payout.recipient, frodo);
        assert_eq!(ledger.balance_of(), Amount::from_wei(750_000_000_000_000_000));
        assert!(matches!(ledger.history().last(), Some(Entry::Withdrawal { .. })));
    }

    #[rstest]
    fn owner_withdraws_zero_from_empty(owner: Identity) {
        let mut ledger = Ledger::initialize(&owner);
        let mut transfer = RecordingTransfer::new();
        ledger.withdraw(&owner, &owner, Amount::ZERO, &mut transfer).unwrap();
        assert_eq!(ledger.balance_of(), Amount::ZERO);
    }

    #[rstest]
    #[case(Amount::ZERO)]
    #[case(ONE)]
    #[case(TWO)]
    fn stranger_is_unauthorized(funded: Ledger, stranger: Identity, #[case] amount: Amount) {
        let mut ledger = funded;
        let mut transfer = RecordingTransfer::new();

        let res = ledger.withdraw(&stranger, &stranger, amount, &mut transfer);

        assert_eq!(res, Err(LedgerError::Unauthorized { caller: stranger.clone() }));
        assert_eq!(ledger.balance_of(), ONE);
        assert!(transfer.payouts.is_empty());
    }

    #[rstest]
    fn overdraw_is_insufficient_funds(funded: Ledger, owner: Identity) {
        let mut ledger = funded;
        let mut transfer = RecordingTransfer::new();

        let res = ledger.withdraw(&owner, &owner, TWO, &mut transfer);

        assert_eq!(res, Err(LedgerError::InsufficientFunds { requested: TWO, available: ONE }));
        assert_eq!(ledger.balance_of(), ONE);
        assert!(transfer.payouts.is_empty());
        assert_eq!(ledger.history().len(), 1);
    }

    #[rstest]
    fn failed_transfer_rolls_back(funded: Ledger, owner: Identity) {
        let mut ledger = funded;
        let before = ledger.clone();
        let mut transfer = RecordingTransfer::failing("recipient rejected funds");

        let res = ledger.withdraw(&owner, &owner, ONE, &mut transfer);

        assert!(matches!(res, Err(LedgerError::TransferFailed { .. })));
        assert_eq!(ledger, before);
    }

    #[rstest]
    fn debit_checks_like_withdraw(funded: Ledger, owner: Identity, stranger: Identity) {
        let mut ledger = funded;

        assert!(matches!(ledger.debit(&stranger, &stranger, Amount::ZERO), Err(LedgerError::Unauthorized { .. })));
        assert!(matches!(ledger.debit(&owner, &owner, TWO), Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(ledger.balance_of(), ONE);

        ledger.debit(&owner, &stranger, ONE).unwrap();
        assert_eq!(ledger.balance_of(), Amount::ZERO);
        assert!(matches!(ledger.history().last(), Some(Entry::Withdrawal { to, .. }) if to == &stranger));
    }

    #[rstest]
    fn owner_never_changes(owner: Identity, stranger: Identity) {
        let mut ledger = Ledger::initialize(&owner);
        let mut transfer = RecordingTransfer::new();

        ledger.deposit(&stranger, TWO).unwrap();
        let _ = ledger.withdraw(&stranger, &stranger, ONE, &mut transfer);
        ledger.withdraw(&owner, &stranger, ONE, &mut transfer).unwrap();
        let _ = ledger.withdraw(&owner, &owner, TWO, &mut transfer);

        assert_eq!(ledger.owner(), &owner);
    }

    #[rstest]
    fn deposit_withdraw_scenario(owner: Identity, stranger: Identity) {
        let mut ledger = Ledger::initialize(&owner);
        let mut transfer = RecordingTransfer::new();
        assert_eq!(ledger.balance_of(), Amount::ZERO);

        ledger.deposit(&stranger, ONE).unwrap();
        assert_eq!(ledger.balance_of(), ONE);

        ledger.withdraw(&owner, &owner, ONE, &mut transfer).unwrap();
        assert_eq!(ledger.balance_of(), Amount::ZERO);

        let res = ledger.withdraw(&stranger, &stranger, Amount::ZERO, &mut transfer);
        assert!(matches!(res, Err(LedgerError::Unauthorized { .. })));
    }

    #[rstest]
    fn consistency_check(owner: Identity, stranger: Identity) {
        const INTERVAL: usize = Ledger::CONSISTENCY_CHECK_INTERVAL;

        let mut ledger = Ledger::initialize(&owner);
        for _ in 0..INTERVAL - 2 {
            ledger.deposit(&stranger, Amount::from_wei(10)).unwrap();
        }
        ledger.consistency_check().unwrap();

        // mess with the balance
        ledger.held_balance = Amount::from_wei(1);

        // this one is not checked
        ledger.deposit(&stranger, Amount::from_wei(10)).unwrap();
        // this one reaches the interval and should be caught
        let res = ledger.deposit(&stranger, Amount::from_wei(10));

        assert_eq!(res, Err(LedgerError::Inconsistent {
            recorded: Amount::from_wei(11),
            replayed: Some(Amount::from_wei(10 * (INTERVAL - 1) as u128))
        }));
        // the failed deposit is not applied
        assert_eq!(ledger.balance_of(), Amount::from_wei(11));
        assert_eq!(ledger.history().len(), INTERVAL - 1);
    }

    #[rstest]
    fn serialize_roundtrip_keeps_state(funded: Ledger, owner: Identity) {
        let mut ledger = funded;
        let mut transfer = RecordingTransfer::new();
        ledger.withdraw(&owner, &Identity::new("Sam"), Amount::from_wei(5), &mut transfer).unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let parsed: Ledger = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, ledger);
        parsed.consistency_check().unwrap();
    }
}
