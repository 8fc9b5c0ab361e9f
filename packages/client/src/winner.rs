use common::{Id, MaterialPatch};
use tracing::{info, instrument};

use crate::error::ClientError;
use crate::list::EntityList;
use crate::resource::Materials;

impl EntityList<Materials> {
    /// Flip a material's winner flag and return the new value.
    ///
    /// Only `is_winner` is sent. The local copy is flipped once the server
    /// acknowledges; its response body is not needed. Toggling twice restores
    /// the original state, and any number of materials may be winners.
    #[instrument(skip(self, id), fields(%id))]
    pub async fn toggle_winner(&mut self, id: &Id) -> Result<bool, ClientError> {
        let current = self
            .get(id)
            .map(|m| m.is_winner)
            .ok_or_else(|| ClientError::NotLoaded(id.clone()))?;
        let next = !current;

        if let Err(err) = self
            .api()
            .apply_patch::<Materials>(id, &MaterialPatch::winner(next))
            .await
        {
            self.record_failure("update", &err);
            return Err(err);
        }

        self.modify_local(id, |m| m.is_winner = next);
        info!(is_winner = next, "Winner flag toggled");
        Ok(next)
    }

    /// Materials currently flagged as winners, in list order.
    pub fn winners(&self) -> impl Iterator<Item = &common::Material> {
        self.items().iter().filter(|m| m.is_winner)
    }
}
