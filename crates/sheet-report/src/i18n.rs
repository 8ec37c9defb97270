//! Localized report text.
//!
//! Every user-facing string is looked up by [`MessageKey`] and filled with
//! `{name}` placeholders. Hebrew is the default report language.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(rename = "he")]
    Hebrew,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hebrew => "he",
            Language::English => "en",
        }
    }

    /// Whether text in this language is laid out right-to-left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Hebrew)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "he" | "heb" | "hebrew" => Ok(Language::Hebrew),
            "en" | "eng" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Keys for every localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    // Section titles
    PreviewTitle,
    MissingTitle,
    CategoricalTitle,
    NumericTitle,
    SummaryTitle,
    OutliersTitle,
    RecommendationsTitle,

    // Preview
    PreviewShape,
    PreviewFirstRows,
    PreviewEmpty,

    // Missing values
    MissingFound,
    MissingLine,
    UnparsableLine,
    MissingTotal,
    NoMissing,
    EmptyTableNothingMissing,
    ChartMissing,

    // Categorical distributions
    CategoricalIntro,
    CategoricalColumnHeader,
    CategoryLine,
    OtherValues,
    NoCategorical,
    CategoricalSingleValue,
    ChartCategorical,

    // Numeric distributions
    NumericIntro,
    NumericColumnLine,
    NoUsableNumeric,
    SkippedColumn,
    ChartHistogram,

    // Skip reasons
    ReasonAllMissing,
    ReasonUnparsable,
    ReasonTooFewValues,
    ReasonNotNumeric,
    ReasonFreeText,

    // Statistical summary
    SummaryIntro,
    NonNumericSummaryIntro,
    SummaryUnavailableIntro,
    NonNumericLine,
    NoValues,
    LabelColumn,
    LabelCount,
    LabelMean,
    LabelStd,
    LabelMin,
    LabelQ1,
    LabelMedian,
    LabelQ3,
    LabelMax,

    // Column types
    TypeNumeric,
    TypeCategorical,
    TypeDatetime,
    TypeEmpty,

    // Outliers
    OutliersIntro,
    OutlierLine,
    OutlierValues,
    NoOutliersColumn,
    OutlierWarning,
    OutliersInsufficient,
    OutlierTooFew,
    OutlierNoNumeric,
    ChartOutliers,

    // Recommendations
    RecHighMissingColumn,
    RecMissingColumn,
    RecUnparsable,
    RecEmptyColumn,
    RecPercentMixed,
    RecSmallDataset,
    RecLargeDataset,
    RecManyColumns,
    RecDuplicates,
    RecStrongCorrelation,
    RecSkewed,
    RecOutliers,
    RecTrendUp,
    RecTrendDown,
    RecCheckQuality,
    RecBackup,
    RecDocument,
    RecVisualize,

    // Fallback notes
    ChartUnavailable,
    ComputationFailed,

    // Insights
    InsightShape,
    InsightMissing,
    InsightDuplicates,
    InsightOutliers,
    InsightCorrelations,
    InsightNumericColumns,
    InsightTextColumns,
}

/// (Hebrew, English) template pair for a key.
fn templates(key: MessageKey) -> (&'static str, &'static str) {
    use MessageKey::*;
    match key {
        PreviewTitle => ("תצוגה מקדימה של הנתונים", "Data preview"),
        MissingTitle => ("ניתוח ערכים חסרים", "Missing values"),
        CategoricalTitle => ("התפלגויות קטגוריות", "Categorical distributions"),
        NumericTitle => ("התפלגויות מספריות", "Numeric distributions"),
        SummaryTitle => ("סיכום סטטיסטי", "Statistical summary"),
        OutliersTitle => ("ניתוח ערכים חריגים", "Outliers"),
        RecommendationsTitle => ("המלצות לשיפור", "Recommendations"),

        PreviewShape => (
            "מימדי הנתונים: {rows} שורות, {columns} עמודות",
            "Data shape: {rows} rows, {columns} columns",
        ),
        PreviewFirstRows => (
            "{count} השורות הראשונות מהנתונים:",
            "First {count} rows of the data:",
        ),
        PreviewEmpty => (
            "הטבלה ריקה - אין שורות להצגה. עמודות: {columns}",
            "The table is empty - there are no rows to show. Columns: {columns}",
        ),

        MissingFound => (
            "נמצאו ערכים חסרים בעמודות הבאות:",
            "Missing values were found in the following columns:",
        ),
        MissingLine => (
            "{column}: {count} ערכים חסרים ({percent}%)",
            "{column}: {count} missing ({percent}%)",
        ),
        UnparsableLine => (
            "{column}: {count} ערכים שלא ניתן לפענח ({percent}%)",
            "{column}: {count} unparsable values ({percent}%)",
        ),
        MissingTotal => (
            "סך הכל ערכים חסרים: {count} מתוך {cells} תאים ({percent}%)",
            "Total missing: {count} of {cells} cells ({percent}%)",
        ),
        NoMissing => (
            "מעולה! לא נמצאו ערכים חסרים בנתונים",
            "No missing values detected",
        ),
        EmptyTableNothingMissing => (
            "הטבלה ריקה - אין ערכים לבדיקה",
            "The table is empty - there are no values to check",
        ),
        ChartMissing => ("ערכים חסרים לפי עמודה", "Missing values per column"),

        CategoricalIntro => (
            "ניתוח העמודות הקטגוריאליות:",
            "Categorical columns:",
        ),
        CategoricalColumnHeader => (
            "{column} ({unique} ערכים ייחודיים):",
            "{column} ({unique} unique values):",
        ),
        CategoryLine => ("  {value}: {count} ({percent}%)", "  {value}: {count} ({percent}%)"),
        OtherValues => ("אחר", "Other"),
        NoCategorical => (
            "לא נמצאו עמודות קטגוריות בנתונים",
            "No categorical columns detected",
        ),
        CategoricalSingleValue => (
            "עמודות עם ערך יחיד בלבד: {columns}",
            "Columns holding a single value only: {columns}",
        ),
        ChartCategorical => ("ערכים נפוצים ביותר", "Most frequent values"),

        NumericIntro => ("ניתוח העמודות המספריות:", "Numeric columns:"),
        NumericColumnLine => (
            "{column}: כמות={count}, ממוצע={mean}, חציון={median}, סטיית תקן={std}, מינימום={min}, מקסימום={max}",
            "{column}: count={count}, mean={mean}, median={median}, std={std}, min={min}, max={max}",
        ),
        NoUsableNumeric => (
            "לא נמצאו עמודות מספריות שמישות בנתונים",
            "No usable numeric columns",
        ),
        SkippedColumn => ("{column}: {reason}", "{column}: {reason}"),
        ChartHistogram => ("התפלגות ערכים", "Value distributions"),

        ReasonAllMissing => ("כל הערכים חסרים", "all values are missing"),
        ReasonUnparsable => (
            "לא ניתן לפענח את הערכים כמספרים ({percent}% לא תקינים)",
            "values could not be parsed as numbers ({percent}% unparsable)",
        ),
        ReasonTooFewValues => (
            "רק {count} ערכים קיימים",
            "only {count} non-missing values",
        ),
        ReasonNotNumeric => ("העמודה היא מסוג {kind}", "column is {kind}"),
        ReasonFreeText => (
            "טקסט חופשי או ערכים ייחודיים רבים מדי",
            "free text or too many distinct values",
        ),

        SummaryIntro => (
            "תקציר סטטיסטי של העמודות המספריות:",
            "Descriptive statistics of the numeric columns:",
        ),
        NonNumericSummaryIntro => (
            "אין עמודות מספריות - סיכום שאר העמודות:",
            "No numeric columns - summary of the other columns:",
        ),
        SummaryUnavailableIntro => (
            "לא ניתן לחשב סטטיסטיקות מספריות - סיכום כל העמודות:",
            "Numeric statistics are unavailable - summary of all columns:",
        ),
        NonNumericLine => (
            "{column} ({kind}): {count} ערכים, {unique} ייחודיים, הנפוץ ביותר: {top}",
            "{column} ({kind}): {count} values, {unique} unique, most frequent: {top}",
        ),
        NoValues => ("אין ערכים", "no values"),
        LabelColumn => ("עמודה", "column"),
        LabelCount => ("כמות", "count"),
        LabelMean => ("ממוצע", "mean"),
        LabelStd => ("סטיית תקן", "std"),
        LabelMin => ("מינימום", "min"),
        LabelQ1 => ("רבעון ראשון", "25%"),
        LabelMedian => ("חציון", "50%"),
        LabelQ3 => ("רבעון שלישי", "75%"),
        LabelMax => ("מקסימום", "max"),

        TypeNumeric => ("מספרית", "numeric"),
        TypeCategorical => ("קטגורית", "categorical"),
        TypeDatetime => ("תאריך", "datetime"),
        TypeEmpty => ("לא שמישה", "unusable"),

        OutliersIntro => (
            "זיהוי ערכים חריגים לפי שיטת IQR:",
            "Outliers detected with the IQR rule:",
        ),
        OutlierLine => (
            "{column}: {count} ערכים חריגים ({percent}%), טווח תקין {low} עד {high}",
            "{column}: {count} outliers ({percent}%), normal range {low} to {high}",
        ),
        OutlierValues => ("  ערכים: {values}", "  values: {values}"),
        NoOutliersColumn => (
            "{column}: לא זוהו ערכים חריגים, טווח תקין {low} עד {high}",
            "{column}: no outliers, normal range {low} to {high}",
        ),
        OutlierWarning => (
            "אחוז גבוה של ערכים חריגים - מומלץ לבדוק",
            "High share of outliers - worth checking",
        ),
        OutliersInsufficient => (
            "אין מספיק נתונים לזיהוי ערכים חריגים",
            "Insufficient data for outlier detection",
        ),
        OutlierTooFew => (
            "{column}: רק {count} ערכים (נדרשים לפחות {min})",
            "{column}: only {count} values (at least {min} required)",
        ),
        OutlierNoNumeric => (
            "אין עמודות מספריות לבדיקה",
            "there are no numeric columns to check",
        ),
        ChartOutliers => ("ערכים חריגים לפי עמודה", "Outliers per column"),

        RecHighMissingColumn => (
            "בעמודה {column} חסרים {percent}% מהערכים - בדוק את מקור הנתונים",
            "Column {column} has {percent}% missing values - check the data source",
        ),
        RecMissingColumn => (
            "בעמודה {column} חסרים {percent}% מהערכים - שקול השלמת נתונים",
            "Column {column} has {percent}% missing values - consider imputation",
        ),
        RecUnparsable => (
            "בעמודה {column} יש {percent}% ערכים שלא ניתן לפענח - בדוק את הפורמט",
            "Column {column} has {percent}% unparsable values - check its formatting",
        ),
        RecEmptyColumn => (
            "בעמודה {column} אין ערכים שמישים - שקול להסיר אותה",
            "Column {column} has no usable values - consider removing it",
        ),
        RecPercentMixed => (
            "בעמודה {column} מעורבים אחוזים ומספרים רגילים - בדוק את קנה המידה",
            "Column {column} mixes percentages with plain numbers - check the scale",
        ),
        RecSmallDataset => (
            "מערך נתונים קטן ({rows} שורות) - תוצאות עלולות להיות לא יציבות",
            "Small dataset ({rows} rows) - results may be unstable",
        ),
        RecLargeDataset => (
            "מערך נתונים גדול ({rows} שורות) - שקול דגימה לבדיקות מהירות",
            "Large dataset ({rows} rows) - consider sampling for quick checks",
        ),
        RecManyColumns => (
            "מספר עמודות רב ({columns}) - שקול בחירת תכונות",
            "Many columns ({columns}) - consider feature selection",
        ),
        RecDuplicates => (
            "נמצאו {count} שורות כפולות - מומלץ לנקות אותן לפני הניתוח",
            "{count} duplicate rows found - consider removing them before analysis",
        ),
        RecStrongCorrelation => (
            "קורלציה חזקה בין {first} לבין {second} ({value}) - שקול להסיר עמודה מיותרת",
            "{first} and {second} are strongly correlated ({value}) - consider dropping one",
        ),
        RecSkewed => (
            "העמודה {column} מוטה ({value}) - שקול טרנספורמציה לוגריתמית או שימוש בחציון",
            "Column {column} is skewed ({value}) - consider a log transform or median-based statistics",
        ),
        RecOutliers => (
            "בעמודה {column} זוהו {count} ערכים חריגים - בדוק אם אלו שגיאות או תופעות אמיתיות",
            "Column {column} has {count} outliers - check whether they are errors or real effects",
        ),
        RecTrendUp => (
            "הנתונים מראים מגמה עולה - בדוק גורמים חיצוניים המשפיעים על המגמה",
            "The data shows an upward trend - check for external drivers",
        ),
        RecTrendDown => (
            "הנתונים מראים מגמה יורדת - מומלץ לחקור את הסיבות לירידה",
            "The data shows a downward trend - investigate the causes",
        ),
        RecCheckQuality => (
            "בדוק תמיד את איכות הנתונים לפני ביצוע ניתוח מתקדם",
            "Always check data quality before advanced analysis",
        ),
        RecBackup => (
            "שמור גרסת גיבוי של הנתונים המקוריים לפני ביצוע שינויים",
            "Keep a backup of the original data before making changes",
        ),
        RecDocument => (
            "תעד את כל השינויים שביצעת בנתונים",
            "Document every change made to the data",
        ),
        RecVisualize => (
            "השתמש בויזואליזציות להבנה טובה יותר של הנתונים",
            "Use visualizations to understand the data better",
        ),

        ChartUnavailable => (
            "לא ניתן היה ליצור תרשים - מוצג טקסט בלבד",
            "The chart could not be produced - showing text only",
        ),
        ComputationFailed => (
            "לא ניתן היה לחשב את הסטטיסטיקות: {reason}",
            "Statistics could not be computed: {reason}",
        ),

        InsightShape => (
            "הנתונים מכילים {rows} שורות ו-{columns} עמודות",
            "The data has {rows} rows and {columns} columns",
        ),
        InsightMissing => (
            "יש {count} ערכים חסרים ({percent}% מהנתונים)",
            "There are {count} missing values ({percent}% of the data)",
        ),
        InsightDuplicates => ("נמצאו {count} שורות כפולות", "{count} duplicate rows found"),
        InsightOutliers => (
            "זוהו {count} ערכים חריגים בעמודות מספריות",
            "{count} outliers detected in numeric columns",
        ),
        InsightCorrelations => (
            "נמצאו {count} קורלציות חזקות בין עמודות",
            "{count} strong correlations found between columns",
        ),
        InsightNumericColumns => (
            "יש {count} עמודות מספריות לניתוח כמותי",
            "{count} numeric columns available for quantitative analysis",
        ),
        InsightTextColumns => (
            "יש {count} עמודות טקסט לניתוח איכותני",
            "{count} text columns available for qualitative analysis",
        ),
    }
}

/// Look up a message and fill its placeholders.
///
/// Unknown placeholders are left as-is.
pub fn tr(lang: Language, key: MessageKey, args: &[(&str, String)]) -> String {
    let (he, en) = templates(key);
    let template = match lang {
        Language::Hebrew => he,
        Language::English => en,
    };
    fill_placeholders(template, args)
}

/// Look up a message that has no placeholders.
pub fn text(lang: Language, key: MessageKey) -> String {
    tr(lang, key, &[])
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid regex: placeholder"));

/// Substituted values are never scanned again, so headers holding `{...}`
/// come out unchanged.
fn fill_placeholders(template: &str, args: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
