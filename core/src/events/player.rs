use std::fmt;

use super::reference::{PlayerRef, Reference, UnresolvedRef};
use crate::context::{IStr, intern, resolve};
use crate::error::Result;
use crate::record::Fields;
use crate::state::{PlayerHandle, PlayerType, Registry};

/// Sent during game setup, one per player slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSetupEvent {
    pub pid: u32,
    pub player: PlayerRef,
    pub player_type: PlayerType,
    /// User id. `None` if not human.
    pub uid: Option<u32>,
    /// Slot id. `None` if not playing.
    pub sid: Option<u32>,
}

impl PlayerSetupEvent {
    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        fields.expect_len(4)?;
        let pid = fields.u32(0, "pid")?;
        Ok(Self {
            pid,
            player: Reference::unresolved(pid),
            player_type: PlayerType::from_code(fields.u32(1, "type")?),
            uid: fields.opt_u32(2, "uid")?,
            sid: fields.opt_u32(3, "sid")?,
        })
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        self.player.resolve_with(|pid| registry.lookup_player(pid))
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.player.pending());
    }
}

impl fmt::Display for PlayerSetupEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>15} - Player setup as {}", self.player, self.player_type)
    }
}

/// A player finished researching an upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeCompleteEvent {
    pub pid: u32,
    pub player: PlayerRef,
    pub upgrade_type_name: IStr,
    /// Times this upgrade has been researched.
    pub count: i64,
}

impl UpgradeCompleteEvent {
    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        fields.expect_len(3)?;
        let pid = fields.u32(0, "pid")?;
        Ok(Self {
            pid,
            player: Reference::unresolved(pid),
            upgrade_type_name: intern(fields.text(1, "upgrade_type_name")?),
            count: fields.int(2, "count")?,
        })
    }

    pub fn upgrade_type_name(&self) -> &'static str {
        resolve(self.upgrade_type_name)
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.player.handle()
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        self.player.resolve_with(|pid| registry.lookup_player(pid))
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.player.pending());
    }
}

impl fmt::Display for UpgradeCompleteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>15} - {} upgrade completed",
            self.player,
            self.upgrade_type_name()
        )
    }
}
