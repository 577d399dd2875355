mod structural;

pub use structural::{
    GarrisonedAt, GarrisonedAtSources, InFleet, InFleetShips, LocatedIn, LocatedInSources,
    OwnedBy, OwnedBySources, StationedAt, StationedAtSources,
};
