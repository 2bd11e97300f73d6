//! Lookup tables for appointment types and DMV locations.
//!
//! Both enums are generated from a single `name => (text, id)` table, so the name-to-variant and
//! variant-to-name directions cannot drift apart. Unknown names parse to the `Invalid` sentinel;
//! `FromStr` and deserialization turn that sentinel into an error instead.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::{QFLOW_ITEM_SELECTOR_PREFIX, QFLOW_ITEM_SELECTOR_SUFFIX};
use crate::error::CoreError;

macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $($variant:ident => ($text:literal, $id:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            /// Sentinel returned by [`Self::parse`] for unknown names.
            Invalid,
            $($variant,)+
        }

        impl $name {
            /// Every valid variant in declaration order. Never contains `Invalid`.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the stable lowercase name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    Self::Invalid => "invalid",
                    $(Self::$variant => $text,)+
                }
            }

            /// Returns the site's `data-id` for this variant (`0` for `Invalid`).
            #[must_use]
            pub const fn id(self) -> u32 {
                match self {
                    Self::Invalid => 0,
                    $(Self::$variant => $id,)+
                }
            }

            /// ## Summary
            /// Parses a name, returning `Invalid` when it is unknown.
            #[must_use]
            pub fn parse(name: &str) -> Self {
                match name {
                    $($text => Self::$variant,)+
                    _ => Self::Invalid,
                }
            }

            #[must_use]
            pub const fn is_valid(self) -> bool {
                !matches!(self, Self::Invalid)
            }

            /// Names of all valid variants.
            #[must_use]
            pub fn valid_names() -> BTreeSet<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }

            /// ## Summary
            /// Formats the CSS selector of the tile the site renders for this variant.
            #[must_use]
            pub fn to_selector(self) -> String {
                format!(
                    "{QFLOW_ITEM_SELECTOR_PREFIX}{}{QFLOW_ITEM_SELECTOR_SUFFIX}",
                    self.id()
                )
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match Self::parse(s) {
                    Self::Invalid => Err(CoreError::UnknownName {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                    valid => Ok(valid),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }
    };
}

catalog_enum! {
    /// Kind of appointment being booked. The id is the tile's `data-id` on the type page and the
    /// `data-appointmenttypeid` carried by matching time options.
    pub enum AppointmentType ("appointment type") {
        DriverLicense => ("driver-license", 1),
        DriverLicenseDuplicate => ("driver-license-duplicate", 2),
        DriverLicenseRenewal => ("driver-license-renewal", 3),
        IdCard => ("id-card", 5),
        KnowledgeTest => ("knowledge-test", 6),
        MotorcycleSkillsTest => ("motorcycle-skills-test", 8),
        Permit => ("permit", 9),
        NonCdlRoadTest => ("non-cdl-road-test", 13),
    }
}

catalog_enum! {
    /// A DMV office. The id is the office tile's `data-id` on the locations page.
    pub enum Location ("location") {
        Aberdeen => ("aberdeen", 100),
        Ahoskie => ("ahoskie", 99),
        Albemarle => ("albemarle", 87),
        Andrews => ("andrews", 142),
        Asheboro => ("asheboro", 97),
        Asheville => ("asheville", 124),
        Boone => ("boone", 125),
        Brevard => ("brevard", 101),
        BrysonCity => ("bryson-city", 126),
        Burgaw => ("burgaw", 111),
        Burnsville => ("burnsville", 68),
        Carrboro => ("carrboro", 140),
        Cary => ("cary", 66),
        CharlotteEast => ("charlotte-east", 120),
        CharlotteNorth => ("charlotte-north", 175),
        CharlotteSouth => ("charlotte-south", 86),
        CharlotteWest => ("charlotte-west", 121),
        Clayton => ("clayton", 42),
        Clinton => ("clinton", 112),
        Clyde => ("clyde", 102),
        Concord => ("concord", 141),
        DurhamEast => ("durham-east", 47),
        DurhamSouth => ("durham-south", 80),
        ElizabethCity => ("elizabeth-city", 65),
        Elizabethtown => ("elizabethtown", 79),
        Elkin => ("elkin", 103),
        Erwin => ("erwin", 95),
        FayettevilleSouth => ("fayetteville-south", 118),
        FayettevilleWest => ("fayetteville-west", 119),
        ForestCity => ("forest-city", 57),
        Franklin => ("franklin", 139),
        FuquayVarina => ("fuquay-varina", 38),
        Garner => ("garner", 69),
        Gastonia => ("gastonia", 59),
        Goldsboro => ("goldsboro", 40),
        Graham => ("graham", 137),
        GreensboroEast => ("greensboro-east", 138),
        GreensboroWest => ("greensboro-west", 143),
        Greenville => ("greenville", 22),
        Hamlet => ("hamlet", 104),
        Havelock => ("havelock", 82),
        Henderson => ("henderson", 70),
        Hendersonville => ("hendersonville", 130),
        Hickory => ("hickory", 78),
        HighPoint => ("high-point", 129),
        Hillsborough => ("hillsborough", 52),
        Hudson => ("hudson", 131),
        Huntersville => ("huntersville", 19),
        Jacksonville => ("jacksonville", 134),
        Jefferson => ("jefferson", 83),
        Kernersville => ("kernersville", 135),
        Kinston => ("kinston", 50),
        Lexington => ("lexington", 73),
        Lincolnton => ("lincolnton", 72),
        Louisburg => ("louisburg", 71),
        Lumberton => ("lumberton", 48),
        Marion => ("marion", 62),
        Marshall => ("marshall", 105),
        Mocksville => ("mocksville", 91),
        Monroe => ("monroe", 96),
        Mooresville => ("mooresville", 110),
        MoreheadCity => ("morehead-city", 41),
        Morganton => ("morganton", 136),
        MountAiry => ("mount-airy", 106),
        MountHolly => ("mount-holly", 81),
        NagsHead => ("nags-head", 155),
        NewBern => ("new-bern", 43),
        Newton => ("newton", 107),
        Oxford => ("oxford", 64),
        Polkton => ("polkton", 63),
        Raeford => ("raeford", 115),
        RaleighEast => ("raleigh-east", 181),
        RaleighNorth => ("raleigh-north", 10),
        RaleighWest => ("raleigh-west", 9),
        RoanokeRapids => ("roanoke-rapids", 61),
        Roxboro => ("roxboro", 76),
        Salisbury => ("salisbury", 93),
        Sanford => ("sanford", 54),
        Shallotte => ("shallotte", 113),
        Shelby => ("shelby", 58),
        SilerCity => ("siler-city", 109),
        Smithfield => ("smithfield", 44),
        Statesville => ("statesville", 55),
        Stedman => ("stedman", 18),
        Sylva => ("sylva", 114),
        Tarboro => ("tarboro", 60),
        Taylorsville => ("taylorsville", 85),
        Thomasville => ("thomasville", 94),
        Troy => ("troy", 77),
        Washington => ("washington", 89),
        Wendell => ("wendell", 39),
        Wentworth => ("wentworth", 56),
        Whiteville => ("whiteville", 53),
        Wilkesboro => ("wilkesboro", 116),
        Williamston => ("williamston", 88),
        WilmingtonNorth => ("wilmington-north", 123),
        WilmingtonSouth => ("wilmington-south", 132),
        Wilson => ("wilson", 45),
        WinstonSalemNorth => ("winstonsalem-north", 51),
        WinstonSalemSouth => ("winstonsalem-south", 122),
        Yadkinville => ("yadkinville", 128),
    }
}
