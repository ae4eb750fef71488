//! Fixed classification tables: categories, keyword rules and result records.

use serde::Serialize;
use utoipa::ToSchema;

/// Closed set of waste categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    Recyclable,
    Organic,
    Electronic,
    Hazardous,
    General,
}

impl WasteCategory {
    /// Every category, in catalogue order.
    pub const ALL: [WasteCategory; 5] = [
        Self::Recyclable,
        Self::Organic,
        Self::Electronic,
        Self::Hazardous,
        Self::General,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Recyclable => "recyclable",
            Self::Organic => "organic",
            Self::Electronic => "electronic",
            Self::Hazardous => "hazardous",
            Self::General => "general",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Recyclable => "Recyclable",
            Self::Organic => "Organic",
            Self::Electronic => "Electronic",
            Self::Hazardous => "Hazardous",
            Self::General => "General Waste",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Recyclable => "Can be processed and made into new products",
            Self::Organic => "Biodegradable waste that can be composted",
            Self::Electronic => "Electronic waste requiring special disposal",
            Self::Hazardous => "Dangerous materials requiring special handling",
            Self::General => "Non-recyclable waste for regular disposal",
        }
    }
}

/// Result keys the lookup can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationKey {
    Plastic,
    Paper,
    Glass,
    Organic,
    Electronics,
    Battery,
    Metal,
    Textile,
    Sanitary,
    Medical,
    /// No keyword matched.
    Unclassified,
}

/// Keyword rules in priority order. The first rule with a keyword contained
/// in the lower-cased label wins, so `bottle` resolves to plastic, never
/// glass.
pub(crate) const KEYWORD_RULES: [(ClassificationKey, &[&str]); 10] = [
    (ClassificationKey::Plastic, &["bottle", "plastic", "pet"]),
    (ClassificationKey::Paper, &["paper", "book", "cardboard"]),
    (ClassificationKey::Glass, &["glass", "bottle"]),
    (
        ClassificationKey::Organic,
        &["food", "fruit", "vegetable", "organic"],
    ),
    (
        ClassificationKey::Electronics,
        &["phone", "laptop", "electronic", "mobile"],
    ),
    (ClassificationKey::Battery, &["battery", "cell"]),
    (
        ClassificationKey::Metal,
        &["metal", "aluminum", "steel", "iron"],
    ),
    (ClassificationKey::Textile, &["cloth", "textile", "fabric"]),
    (ClassificationKey::Sanitary, &["sanitary", "pad", "diaper"]),
    (ClassificationKey::Medical, &["medicine", "syringe", "pill"]),
];

/// Static record behind a key.
#[derive(Debug)]
pub(crate) struct RecordSpec {
    pub category: WasteCategory,
    pub confidence_percent: u8,
    pub instructions: &'static str,
    pub tips: &'static [&'static str],
    pub eco_points: u32,
}

impl ClassificationKey {
    /// Keys reachable through keyword rules; the random fallback draws from
    /// these.
    pub const MATCHABLE: [ClassificationKey; 10] = [
        Self::Plastic,
        Self::Paper,
        Self::Glass,
        Self::Organic,
        Self::Electronics,
        Self::Battery,
        Self::Metal,
        Self::Textile,
        Self::Sanitary,
        Self::Medical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Paper => "paper",
            Self::Glass => "glass",
            Self::Organic => "organic",
            Self::Electronics => "electronics",
            Self::Battery => "battery",
            Self::Metal => "metal",
            Self::Textile => "textile",
            Self::Sanitary => "sanitary",
            Self::Medical => "medical",
            Self::Unclassified => "unclassified",
        }
    }

    pub(crate) fn spec(self) -> &'static RecordSpec {
        match self {
            Self::Plastic => &PLASTIC,
            Self::Paper => &PAPER,
            Self::Glass => &GLASS,
            Self::Organic => &ORGANIC,
            Self::Electronics => &ELECTRONICS,
            Self::Battery => &BATTERY,
            Self::Metal => &METAL,
            Self::Textile => &TEXTILE,
            Self::Sanitary => &SANITARY,
            Self::Medical => &MEDICAL,
            Self::Unclassified => &UNCLASSIFIED,
        }
    }
}

static PLASTIC: RecordSpec = RecordSpec {
    category: WasteCategory::Recyclable,
    confidence_percent: 94,
    instructions: "Clean thoroughly and place in dry waste bin. Contact local kabadiwala or recycling center.",
    tips: &[
        "Remove all food residue before disposal",
        "Separate PET bottles from other plastics",
        "Check with your local Municipal Corporation for collection timings",
        "Many plastic items can be sold to scrap dealers",
    ],
    eco_points: 10,
};

static PAPER: RecordSpec = RecordSpec {
    category: WasteCategory::Recyclable,
    confidence_percent: 92,
    instructions: "Keep dry and bundle with string. Sell to local raddi-wallah or recycling vendor.",
    tips: &[
        "Remove any plastic coating or staples",
        "Newspaper, magazines, and cardboard have good resale value",
        "Wet paper cannot be recycled - keep it dry",
        "Office paper fetches better price than newspaper",
    ],
    eco_points: 8,
};

static ORGANIC: RecordSpec = RecordSpec {
    category: WasteCategory::Organic,
    confidence_percent: 97,
    instructions: "Use for composting at home or give to wet waste collection. Perfect for kitchen gardens.",
    tips: &[
        "Start home composting with kitchen scraps",
        "Coconut shells can be used as planters after composting",
        "Fruit peels make excellent natural fertilizer",
        "Avoid adding cooked food to compost to prevent pests",
    ],
    eco_points: 15,
};

static GLASS: RecordSpec = RecordSpec {
    category: WasteCategory::Recyclable,
    confidence_percent: 89,
    instructions: "Clean and place carefully in recycling bin. Glass bottles have good resale value.",
    tips: &[
        "Beer and wine bottles can be returned to some shops",
        "Separate colored glass from clear glass",
        "Remove metal caps and lids before recycling",
        "Broken glass should be wrapped safely before disposal",
    ],
    eco_points: 12,
};

static ELECTRONICS: RecordSpec = RecordSpec {
    category: WasteCategory::Electronic,
    confidence_percent: 91,
    instructions: "Take to authorized e-waste collection centers or participating retail stores.",
    tips: &[
        "Many mobile retailers accept old phones during upgrades",
        "Government e-waste collection drives happen regularly",
        "Remove personal data and SIM cards before disposal",
        "Some components contain valuable metals - never burn e-waste",
    ],
    eco_points: 25,
};

static BATTERY: RecordSpec = RecordSpec {
    category: WasteCategory::Hazardous,
    confidence_percent: 98,
    instructions: "Never mix with regular waste. Drop at battery collection points in electronics stores.",
    tips: &[
        "Many mobile stores accept old batteries",
        "Car batteries can be exchanged at auto service centers",
        "Alkaline batteries are less toxic but still need proper disposal",
        "Never burn or bury batteries as they contaminate soil and water",
    ],
    eco_points: 30,
};

static METAL: RecordSpec = RecordSpec {
    category: WasteCategory::Recyclable,
    confidence_percent: 95,
    instructions: "Clean and sell to local scrap dealer. Metal has excellent recycling value in India.",
    tips: &[
        "Aluminum cans and foil have high scrap value",
        "Separate ferrous (iron) from non-ferrous metals",
        "Clean containers fetch better prices from kabadiwala",
        "Copper and brass items have premium recycling rates",
    ],
    eco_points: 18,
};

static TEXTILE: RecordSpec = RecordSpec {
    category: WasteCategory::Recyclable,
    confidence_percent: 87,
    instructions: "Donate wearable clothes or give to textile recyclers. Many NGOs accept cloth donations.",
    tips: &[
        "Good condition clothes can be donated to NGOs or orphanages",
        "Torn clothes can be used as cleaning rags",
        "Cotton and silk can be composted after removing synthetic blends",
        "Some brands have take-back programs for old garments",
    ],
    eco_points: 14,
};

static SANITARY: RecordSpec = RecordSpec {
    category: WasteCategory::Hazardous,
    confidence_percent: 93,
    instructions: "Wrap securely and dispose in general waste. Consider switching to eco-friendly alternatives.",
    tips: &[
        "Sanitary napkins take 500-800 years to decompose",
        "Consider menstrual cups or biodegradable pads",
        "Diapers should be cleaned of organic matter before disposal",
        "Never flush sanitary products as they block sewage systems",
    ],
    eco_points: 5,
};

static MEDICAL: RecordSpec = RecordSpec {
    category: WasteCategory::Hazardous,
    confidence_percent: 99,
    instructions: "Return to pharmacy or hospital for safe disposal. Never mix with household waste.",
    tips: &[
        "Expired medicines should be returned to chemist shops",
        "Syringes and needles need special biomedical waste disposal",
        "Many hospitals have medical waste collection points",
        "Never burn or bury medical waste as it can be toxic",
    ],
    eco_points: 35,
};

static UNCLASSIFIED: RecordSpec = RecordSpec {
    category: WasteCategory::General,
    confidence_percent: 0,
    instructions: "We could not identify this item. Dispose of it with general waste or ask your local collection service.",
    tips: &[
        "Try a clearer name or photo of the item",
        "When in doubt, keep it out of the recycling bin",
        "Check with your local Municipal Corporation for disposal rules",
    ],
    eco_points: 0,
};
