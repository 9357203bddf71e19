use core::ops::Deref;

/// State that can be snapshotted before a proposal and reinstated if the
/// proposal is rejected.
///
/// Unlike [`Tree`](crate::tree::Tree), which journals its own edits, the
/// companions of a tree (population functions, rate models, random number
/// generators) are restored wholesale from a [`BackedUp`] snapshot.
#[allow(clippy::inline_always, clippy::inline_fn_without_body)]
#[contract_trait]
pub trait Backup: Sized {
    /// # Safety
    ///
    /// The copy must only be used to restore `self`, never alongside it.
    #[must_use]
    unsafe fn backup_unchecked(&self) -> Self;

    fn backup(&self) -> BackedUp<Self> {
        BackedUp(unsafe { self.backup_unchecked() })
    }

    /// Replaces `self` with the snapshot taken by [`Backup::backup`].
    fn restore(&mut self, backup: BackedUp<Self>) {
        *self = backup.0;
    }
}

#[allow(clippy::module_name_repetitions)]
pub struct BackedUp<T: Backup>(T);

impl<T: Backup> BackedUp<T> {
    #[must_use]
    pub fn resume(self) -> T {
        self.0
    }
}

impl<T: Backup> Deref for BackedUp<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
