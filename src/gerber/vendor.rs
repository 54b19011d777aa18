//! Manufacturer file-set registry.
//!
//! Each [`Vendor`] names the filename suffixes a manufacturer expects in an
//! upload. The suffix order is the top-to-bottom layer stacking order used
//! when previewing, so the table is the single source of truth for both the
//! archive builder and the stack sorter.
//!
//! | Vendor | Archive id | First layer |
//! |---|---|---|
//! | Seeed Studio | `seedstudio` | `F.SilkS.gto` |
//! | PCBWay | `pcbway` | `F.Cu.gbr` |
//! | JLCPCB (KiCad 5) | `jlcpcb` | `F_Cu.gbr` |
//! | JLCPCB (KiCad 6+) | `jlcpcb` | `F_Cu.gtl` |

use std::fmt;
use std::str::FromStr;

use crate::gerber::error::{GerberError, GerberResult};

/// Suffix shared by every profile. Drill files always stack last.
pub const DRILL_SUFFIX: &str = ".drl";

const SEED_STUDIO: &[&str] = &[
    "F.SilkS.gto",
    "F.Cu.gtl",
    "F.Paste.gtp",
    "F.Mask.gts",
    "B.Paste.gbp",
    "B.Cu.gbl",
    "B.SilkS.gbo",
    "B.Mask.gbs",
    "Dwgs.User.gbr",
    "Edge.Cuts.gm1",
    DRILL_SUFFIX,
];

const PCBWAY: &[&str] = &[
    "F.Cu.gbr",
    "F.SilkS.gbr",
    "F.Mask.gbr",
    "B.Cu.gbr",
    "B.SilkS.gbr",
    "Edge.Cuts.gbr",
    "B.Mask.gbr",
    DRILL_SUFFIX,
];

const JLCPCB_V5: &[&str] = &[
    "F_Cu.gbr",
    "F_SilkS.gbr",
    "F_Mask.gbr",
    "B_Cu.gbr",
    "B_SilkS.gbr",
    "Edge_Cuts.gbr",
    "B_Mask.gbr",
    DRILL_SUFFIX,
];

const JLCPCB_V6: &[&str] = &[
    "F_Cu.gtl",
    "B_Cu.gbl",
    "F_Paste.gtp",
    "B_Paste.gbp",
    "F_Silkscreen.gto",
    "B_Silkscreen.gbo",
    "F_Mask.gts",
    "B_Mask.gbs",
    "Edge_Cuts.gm1",
    DRILL_SUFFIX,
];

/// A manufacturer and toolchain variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Seeed Studio Fusion PCB.
    SeedStudio,
    /// PCBWay.
    PcbWay,
    /// JLCPCB with KiCad 5 plot names (`.gbr` everywhere).
    JlcPcbV5,
    /// JLCPCB with KiCad 6 and later plot names (Protel extensions).
    JlcPcbV6,
}

impl Vendor {
    /// Every profile, in menu order.
    pub const ALL: [Self; 4] = [Self::SeedStudio, Self::PcbWay, Self::JlcPcbV5, Self::JlcPcbV6];

    /// Order in which profiles are tried when inferring a vendor from files.
    pub const DETECTION_ORDER: [Self; 4] =
        [Self::PcbWay, Self::SeedStudio, Self::JlcPcbV5, Self::JlcPcbV6];

    /// Required filename suffixes in top-to-bottom stacking order.
    #[must_use]
    pub const fn required_suffixes(self) -> &'static [&'static str] {
        match self {
            Self::SeedStudio => SEED_STUDIO,
            Self::PcbWay => PCBWAY,
            Self::JlcPcbV5 => JLCPCB_V5,
            Self::JlcPcbV6 => JLCPCB_V6,
        }
    }

    /// The suffix used to recognise this profile in an arbitrary file list.
    #[must_use]
    pub const fn first_suffix(self) -> &'static str {
        self.required_suffixes()[0]
    }

    /// Identifier used in archive file names.
    #[must_use]
    pub const fn archive_id(self) -> &'static str {
        match self {
            Self::SeedStudio => "seedstudio",
            Self::PcbWay => "pcbway",
            Self::JlcPcbV5 | Self::JlcPcbV6 => "jlcpcb",
        }
    }

    /// Name accepted on the command line.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::SeedStudio => "seedstudio",
            Self::PcbWay => "pcbway",
            Self::JlcPcbV5 => "jlcpcb-v5",
            Self::JlcPcbV6 => "jlcpcb-v6",
        }
    }

    /// Human readable label shown in the manufacturer menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeedStudio => "SeedStudio",
            Self::PcbWay => "PCBWay",
            Self::JlcPcbV5 => "JLCPCB (Kicad V5)",
            Self::JlcPcbV6 => "JLCPCB (Kicad V6)",
        }
    }

    /// Number shown next to the vendor in the manufacturer menu.
    #[must_use]
    pub const fn menu_number(self) -> u8 {
        match self {
            Self::SeedStudio => 1,
            Self::PcbWay => 2,
            Self::JlcPcbV5 => 3,
            Self::JlcPcbV6 => 4,
        }
    }

    /// Resolves a manufacturer menu answer (`"1"` to `"4"`).
    ///
    /// # Errors
    ///
    /// Returns [`GerberError::InvalidVendorSelection`] for any other answer.
    pub fn from_menu_selection(selection: &str) -> GerberResult<Self> {
        let selection = selection.trim();
        Self::ALL
            .into_iter()
            .find(|v| selection == v.menu_number().to_string())
            .ok_or_else(|| GerberError::invalid_vendor_selection(selection))
    }
}

/// Returns the required suffixes for a vendor in stacking order.
#[must_use]
pub const fn required_files_for(vendor: Vendor) -> &'static [&'static str] {
    vendor.required_suffixes()
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Vendor {
    type Err = GerberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.cli_name() == wanted)
            .map_or_else(|| Self::from_menu_selection(&wanted), Ok)
    }
}
