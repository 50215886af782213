//! Coarse unit classification by type name.
//!
//! Tracker records carry type names, not game data, so army and building
//! flags come from a static table of melee unit names. Campaign, co-op and
//! custom-map types fall through to [`UnitClass::Other`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    Worker,
    Army,
    Building,
    Other,
}

/// Non-army types whose death still counts toward losses.
pub const COUNTED_NON_ARMY: &[&str] = &["LurkerBurrowed", "Drone", "Probe", "SCV"];

/// Army types whose death is never counted.
pub const UNCOUNTED_ARMY: &[&str] = &["Broodling"];

/// Placeholder the engine spawns for targeting; never a real unit.
pub const TARGET_DUMMY: &str = "InvisibleTargetDummy";

impl UnitClass {
    pub fn of(type_name: &str) -> Self {
        match type_name {
            "SCV" | "Probe" | "Drone" | "DroneBurrowed" | "MULE" => Self::Worker,

            // Terran
            "Marine" | "Marauder" | "Reaper" | "Ghost" | "Hellion" | "HellionTank"
            | "WidowMine" | "WidowMineBurrowed" | "SiegeTank" | "SiegeTankSieged" | "Cyclone"
            | "Thor" | "ThorAP" | "VikingFighter" | "VikingAssault" | "Medivac" | "Liberator"
            | "LiberatorAG" | "Raven" | "Banshee" | "Battlecruiser"
            // Protoss
            | "Zealot" | "Stalker" | "Sentry" | "Adept" | "HighTemplar" | "DarkTemplar"
            | "Archon" | "Immortal" | "Colossus" | "Disruptor" | "Observer"
            | "ObserverSiegeMode" | "WarpPrism" | "WarpPrismPhasing" | "Phoenix" | "VoidRay"
            | "Oracle" | "Tempest" | "Carrier" | "Mothership"
            // Zerg
            | "Queen" | "QueenBurrowed" | "Zergling" | "ZerglingBurrowed" | "Baneling"
            | "BanelingBurrowed" | "Roach" | "RoachBurrowed" | "Ravager" | "Hydralisk"
            | "HydraliskBurrowed" | "LurkerMP" | "Infestor" | "InfestorBurrowed"
            | "SwarmHostMP" | "SwarmHostBurrowedMP" | "Ultralisk" | "UltraliskBurrowed"
            | "Mutalisk" | "Corruptor" | "BroodLord" | "Viper" | "Overseer"
            | "OverseerSiegeMode" | "Broodling" => Self::Army,

            // Terran
            "CommandCenter" | "CommandCenterFlying" | "OrbitalCommand"
            | "OrbitalCommandFlying" | "PlanetaryFortress" | "SupplyDepot"
            | "SupplyDepotLowered" | "Refinery" | "RefineryRich" | "Barracks"
            | "BarracksFlying" | "BarracksReactor" | "BarracksTechLab" | "Factory"
            | "FactoryFlying" | "FactoryReactor" | "FactoryTechLab" | "Starport"
            | "StarportFlying" | "StarportReactor" | "StarportTechLab" | "Reactor" | "TechLab"
            | "EngineeringBay" | "Armory" | "Bunker" | "MissileTurret" | "SensorTower"
            | "GhostAcademy" | "FusionCore"
            // Protoss
            | "Nexus" | "Pylon" | "Assimilator" | "AssimilatorRich" | "Gateway" | "WarpGate"
            | "Forge" | "CyberneticsCore" | "PhotonCannon" | "ShieldBattery"
            | "TwilightCouncil" | "RoboticsFacility" | "RoboticsBay" | "Stargate"
            | "FleetBeacon" | "TemplarArchives" | "DarkShrine"
            // Zerg
            | "Hatchery" | "Lair" | "Hive" | "Extractor" | "ExtractorRich" | "SpawningPool"
            | "EvolutionChamber" | "RoachWarren" | "BanelingNest" | "SpineCrawler"
            | "SpineCrawlerUprooted" | "SporeCrawler" | "SporeCrawlerUprooted"
            | "HydraliskDen" | "LurkerDenMP" | "InfestationPit" | "Spire" | "GreaterSpire"
            | "NydusNetwork" | "NydusCanal" | "UltraliskCavern" | "CreepTumor"
            | "CreepTumorBurrowed" | "CreepTumorQueen" => Self::Building,

            _ => Self::Other,
        }
    }
}

/// Whether a unit of this type counts as a production entry.
pub fn is_counted_type(type_name: &str) -> bool {
    type_name != TARGET_DUMMY
}

/// Whether the death of a unit of this type counts toward losses.
pub fn is_countable_death(type_name: &str) -> bool {
    (UnitClass::of(type_name) == UnitClass::Army || COUNTED_NON_ARMY.contains(&type_name))
        && !UNCOUNTED_ARMY.contains(&type_name)
}
