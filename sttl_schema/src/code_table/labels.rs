//! Built-in label lists, in code-assignment order.

/// Entity types, coded `A` through `Q`.
pub const ENTITY_TYPE_LABELS: &[&str] = &[
    "Person",
    "Animal",
    "Organization",
    "Object",
    "Scene",
    "VisualContent",
    "Term",
    "Event",
    "Action",
    "Speech",
    "Audio",
    "Sound",
    "Emotion",
    "Subtitle",
    "Topic",
    "Concept",
    "Shot",
];

/// Attribute names, sorted, with nested `Appearance` traits flattened.
pub const ATTRIBUTE_LABELS: &[&str] = &[
    "Appearance.Accessories",
    "Appearance.AgeGroup",
    "Appearance.Build",
    "Appearance.Clothing",
    "Appearance.Color",
    "Appearance.Expression",
    "Appearance.Gender",
    "Appearance.Hairstyle",
    "Appearance.Posture",
    "Appearance.Size",
    "Appearance.SkinColor",
    "Behavior",
    "Brand",
    "Camera",
    "Cause",
    "Color",
    "Content",
    "Definition",
    "Description",
    "Direction",
    "Domain",
    "Duration",
    "Emotion",
    "EndTime",
    "Environment",
    "Function",
    "ID",
    "Intensity",
    "Keywords",
    "Language",
    "Lighting",
    "Location",
    "Loudness",
    "Material",
    "Name",
    "Participants",
    "Pitch",
    "Quantity",
    "Role",
    "Season",
    "Source",
    "Speaker",
    "Species",
    "StartTime",
    "Style",
    "Target",
    "Time",
    "Timestamp",
    "Timing",
    "Tone",
    "Type",
    "Verb",
    "Volume",
    "Weather",
];

/// Relation names, sorted.
pub const RELATION_LABELS: &[&str] = &[
    "Addressing",
    "AssociatedWith",
    "BasedOn",
    "CausedBy",
    "DepictedOn",
    "Describes",
    "Expresses",
    "Founded",
    "Has",
    "IndicatesSeason",
    "InteractWith",
    "Involves",
    "IsA",
    "LocatedAt",
    "LocatedIn",
    "MemberOf",
    "OccursAt",
    "OccursIn",
    "PartOf",
    "Performs",
    "RelatedTo",
    "ShownIn",
    "SpokenBy",
    "Under",
    "UsedIn",
    "Uses",
    "Watching",
    "WorksFor",
];

/// Entity type that receives person-specific treatment during extraction.
pub const PERSON: &str = "Person";

/// Attribute holding an entity's display name.
pub const NAME_ATTRIBUTE: &str = "Name";

/// Attribute holding what a person is doing.
pub const BEHAVIOR_ATTRIBUTE: &str = "Behavior";
