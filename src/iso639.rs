//! ISO 639-1 / 639-2 language code resolver
//!
//! Judges the language token taken from a subtitle filename. A token can be
//! a two-letter ISO 639-1 code, a three-letter ISO 639-2 code (bibliographic
//! or terminology form), or neither. Cross-mapping between the two standards
//! is used to suggest a corrected code.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;

/// The ISO 639 part a run expects subtitle codes to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsoStandard {
    /// ISO 639-1, two letters
    #[serde(rename = "1")]
    Part1,
    /// ISO 639-2, three letters
    #[serde(rename = "2")]
    Part2,
}

impl IsoStandard {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IsoStandard::Part1 => "1",
            IsoStandard::Part2 => "2",
        }
    }

    /// The standard this one cross-maps with
    pub fn other(&self) -> IsoStandard {
        match self {
            IsoStandard::Part1 => IsoStandard::Part2,
            IsoStandard::Part2 => IsoStandard::Part1,
        }
    }
}

impl fmt::Display for IsoStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ISO 639-{}", self.as_str())
    }
}

impl FromStr for IsoStandard {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "639-1" | "iso-639-1" => Ok(IsoStandard::Part1),
            "2" | "639-2" | "iso-639-2" => Ok(IsoStandard::Part2),
            other => Err(AuditError::configuration(format!(
                "expected ISO mode 1 (two letter language code) or 2 (three letter language code), got {:?}",
                other
            ))),
        }
    }
}

/// The standard a token was classified under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeStandard {
    /// Valid ISO 639-1 code
    #[serde(rename = "1")]
    Part1,
    /// Valid ISO 639-2 code
    #[serde(rename = "2")]
    Part2,
    /// Matches neither standard
    #[serde(rename = "none")]
    Unrecognized,
}

impl CodeStandard {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeStandard::Part1 => "1",
            CodeStandard::Part2 => "2",
            CodeStandard::Unrecognized => "none",
        }
    }

    /// The matching requested standard, if any
    pub fn as_iso(&self) -> Option<IsoStandard> {
        match self {
            CodeStandard::Part1 => Some(IsoStandard::Part1),
            CodeStandard::Part2 => Some(IsoStandard::Part2),
            CodeStandard::Unrecognized => None,
        }
    }
}

impl From<IsoStandard> for CodeStandard {
    fn from(standard: IsoStandard) -> Self {
        match standard {
            IsoStandard::Part1 => CodeStandard::Part1,
            IsoStandard::Part2 => CodeStandard::Part2,
        }
    }
}

/// Result of classifying a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Standard the token validates under
    pub standard: CodeStandard,
    /// English name of the language, when recognized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
}

/// Whether a token is acceptable under a requested standard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeVerdict {
    /// How the token classified
    pub found: Classification,
    /// The standard that was requested
    pub expected: IsoStandard,
    /// The equivalent code in the requested standard, when one exists
    pub suggestion: Option<String>,
}

impl CodeVerdict {
    /// Compliant only when the classified standard equals the requested one
    pub fn is_compliant(&self) -> bool {
        self.found.standard == CodeStandard::from(self.expected)
    }
}

/// One row of the ISO 639-2 registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Bibliographic ISO 639-2 code
    pub part2b: &'static str,
    /// Terminology ISO 639-2 code, when it differs from the bibliographic one
    pub part2t: Option<&'static str>,
    /// ISO 639-1 code, when the language has one
    pub part1: Option<&'static str>,
    /// English name
    pub name: &'static str,
}

impl LanguageEntry {
    /// The terminology code, falling back to the bibliographic one
    pub fn terminology(&self) -> &'static str {
        self.part2t.unwrap_or(self.part2b)
    }
}

const fn entry(
    part2b: &'static str,
    part2t: &'static str,
    part1: &'static str,
    name: &'static str,
) -> LanguageEntry {
    LanguageEntry {
        part2b,
        part2t: if part2t.is_empty() { None } else { Some(part2t) },
        part1: if part1.is_empty() { None } else { Some(part1) },
        name,
    }
}

static LANGUAGES: &[LanguageEntry] = &[
    entry("aar", "", "aa", "Afar"),
    entry("abk", "", "ab", "Abkhazian"),
    entry("ace", "", "", "Achinese"),
    entry("ach", "", "", "Acoli"),
    entry("ada", "", "", "Adangme"),
    entry("ady", "", "", "Adyghe"),
    entry("afa", "", "", "Afro-Asiatic languages"),
    entry("afh", "", "", "Afrihili"),
    entry("afr", "", "af", "Afrikaans"),
    entry("ain", "", "", "Ainu"),
    entry("aka", "", "ak", "Akan"),
    entry("akk", "", "", "Akkadian"),
    entry("alb", "sqi", "sq", "Albanian"),
    entry("ale", "", "", "Aleut"),
    entry("alg", "", "", "Algonquian languages"),
    entry("alt", "", "", "Southern Altai"),
    entry("amh", "", "am", "Amharic"),
    entry("ang", "", "", "English, Old (ca.450-1100)"),
    entry("anp", "", "", "Angika"),
    entry("apa", "", "", "Apache languages"),
    entry("ara", "", "ar", "Arabic"),
    entry("arc", "", "", "Official Aramaic"),
    entry("arg", "", "an", "Aragonese"),
    entry("arm", "hye", "hy", "Armenian"),
    entry("arn", "", "", "Mapudungun"),
    entry("arp", "", "", "Arapaho"),
    entry("art", "", "", "Artificial languages"),
    entry("arw", "", "", "Arawak"),
    entry("asm", "", "as", "Assamese"),
    entry("ast", "", "", "Asturian"),
    entry("ath", "", "", "Athapascan languages"),
    entry("aus", "", "", "Australian languages"),
    entry("ava", "", "av", "Avaric"),
    entry("ave", "", "ae", "Avestan"),
    entry("awa", "", "", "Awadhi"),
    entry("aym", "", "ay", "Aymara"),
    entry("aze", "", "az", "Azerbaijani"),
    entry("bad", "", "", "Banda languages"),
    entry("bai", "", "", "Bamileke languages"),
    entry("bak", "", "ba", "Bashkir"),
    entry("bal", "", "", "Baluchi"),
    entry("bam", "", "bm", "Bambara"),
    entry("ban", "", "", "Balinese"),
    entry("baq", "eus", "eu", "Basque"),
    entry("bas", "", "", "Basa"),
    entry("bat", "", "", "Baltic languages"),
    entry("bej", "", "", "Beja"),
    entry("bel", "", "be", "Belarusian"),
    entry("bem", "", "", "Bemba"),
    entry("ben", "", "bn", "Bengali"),
    entry("ber", "", "", "Berber languages"),
    entry("bho", "", "", "Bhojpuri"),
    entry("bih", "", "bh", "Bihari languages"),
    entry("bik", "", "", "Bikol"),
    entry("bin", "", "", "Bini"),
    entry("bis", "", "bi", "Bislama"),
    entry("bla", "", "", "Siksika"),
    entry("bnt", "", "", "Bantu languages"),
    entry("bos", "", "bs", "Bosnian"),
    entry("bra", "", "", "Braj"),
    entry("bre", "", "br", "Breton"),
    entry("btk", "", "", "Batak languages"),
    entry("bua", "", "", "Buriat"),
    entry("bug", "", "", "Buginese"),
    entry("bul", "", "bg", "Bulgarian"),
    entry("bur", "mya", "my", "Burmese"),
    entry("byn", "", "", "Blin"),
    entry("cad", "", "", "Caddo"),
    entry("cai", "", "", "Central American Indian languages"),
    entry("car", "", "", "Galibi Carib"),
    entry("cat", "", "ca", "Catalan"),
    entry("cau", "", "", "Caucasian languages"),
    entry("ceb", "", "", "Cebuano"),
    entry("cel", "", "", "Celtic languages"),
    entry("cha", "", "ch", "Chamorro"),
    entry("chb", "", "", "Chibcha"),
    entry("che", "", "ce", "Chechen"),
    entry("chg", "", "", "Chagatai"),
    entry("chi", "zho", "zh", "Chinese"),
    entry("chk", "", "", "Chuukese"),
    entry("chm", "", "", "Mari"),
    entry("chn", "", "", "Chinook jargon"),
    entry("cho", "", "", "Choctaw"),
    entry("chp", "", "", "Chipewyan"),
    entry("chr", "", "", "Cherokee"),
    entry("chu", "", "cu", "Church Slavic"),
    entry("chv", "", "cv", "Chuvash"),
    entry("chy", "", "", "Cheyenne"),
    entry("cmc", "", "", "Chamic languages"),
    entry("cnr", "", "", "Montenegrin"),
    entry("cop", "", "", "Coptic"),
    entry("cor", "", "kw", "Cornish"),
    entry("cos", "", "co", "Corsican"),
    entry("cpe", "", "", "Creoles and pidgins, English based"),
    entry("cpf", "", "", "Creoles and pidgins, French-based"),
    entry("cpp", "", "", "Creoles and pidgins, Portuguese-based"),
    entry("cre", "", "cr", "Cree"),
    entry("crh", "", "", "Crimean Tatar"),
    entry("crp", "", "", "Creoles and pidgins"),
    entry("csb", "", "", "Kashubian"),
    entry("cus", "", "", "Cushitic languages"),
    entry("cze", "ces", "cs", "Czech"),
    entry("dak", "", "", "Dakota"),
    entry("dan", "", "da", "Danish"),
    entry("dar", "", "", "Dargwa"),
    entry("day", "", "", "Land Dayak languages"),
    entry("del", "", "", "Delaware"),
    entry("den", "", "", "Slave (Athapascan)"),
    entry("dgr", "", "", "Dogrib"),
    entry("din", "", "", "Dinka"),
    entry("div", "", "dv", "Divehi"),
    entry("doi", "", "", "Dogri"),
    entry("dra", "", "", "Dravidian languages"),
    entry("dsb", "", "", "Lower Sorbian"),
    entry("dua", "", "", "Duala"),
    entry("dum", "", "", "Dutch, Middle (ca.1050-1350)"),
    entry("dut", "nld", "nl", "Dutch"),
    entry("dyu", "", "", "Dyula"),
    entry("dzo", "", "dz", "Dzongkha"),
    entry("efi", "", "", "Efik"),
    entry("egy", "", "", "Egyptian (Ancient)"),
    entry("eka", "", "", "Ekajuk"),
    entry("elx", "", "", "Elamite"),
    entry("eng", "", "en", "English"),
    entry("enm", "", "", "English, Middle (1100-1500)"),
    entry("epo", "", "eo", "Esperanto"),
    entry("est", "", "et", "Estonian"),
    entry("ewe", "", "ee", "Ewe"),
    entry("ewo", "", "", "Ewondo"),
    entry("fan", "", "", "Fang"),
    entry("fao", "", "fo", "Faroese"),
    entry("fat", "", "", "Fanti"),
    entry("fij", "", "fj", "Fijian"),
    entry("fil", "", "", "Filipino"),
    entry("fin", "", "fi", "Finnish"),
    entry("fiu", "", "", "Finno-Ugrian languages"),
    entry("fon", "", "", "Fon"),
    entry("fre", "fra", "fr", "French"),
    entry("frm", "", "", "French, Middle (ca.1400-1600)"),
    entry("fro", "", "", "French, Old (842-ca.1400)"),
    entry("frr", "", "", "Northern Frisian"),
    entry("frs", "", "", "Eastern Frisian"),
    entry("fry", "", "fy", "Western Frisian"),
    entry("ful", "", "ff", "Fulah"),
    entry("fur", "", "", "Friulian"),
    entry("gaa", "", "", "Ga"),
    entry("gay", "", "", "Gayo"),
    entry("gba", "", "", "Gbaya"),
    entry("gem", "", "", "Germanic languages"),
    entry("geo", "kat", "ka", "Georgian"),
    entry("ger", "deu", "de", "German"),
    entry("gez", "", "", "Geez"),
    entry("gil", "", "", "Gilbertese"),
    entry("gla", "", "gd", "Gaelic"),
    entry("gle", "", "ga", "Irish"),
    entry("glg", "", "gl", "Galician"),
    entry("glv", "", "gv", "Manx"),
    entry("gmh", "", "", "German, Middle High (ca.1050-1500)"),
    entry("goh", "", "", "German, Old High (ca.750-1050)"),
    entry("gon", "", "", "Gondi"),
    entry("gor", "", "", "Gorontalo"),
    entry("got", "", "", "Gothic"),
    entry("grb", "", "", "Grebo"),
    entry("grc", "", "", "Greek, Ancient (to 1453)"),
    entry("gre", "ell", "el", "Greek, Modern (1453-)"),
    entry("grn", "", "gn", "Guarani"),
    entry("gsw", "", "", "Swiss German"),
    entry("guj", "", "gu", "Gujarati"),
    entry("gwi", "", "", "Gwich'in"),
    entry("hai", "", "", "Haida"),
    entry("hat", "", "ht", "Haitian"),
    entry("hau", "", "ha", "Hausa"),
    entry("haw", "", "", "Hawaiian"),
    entry("heb", "", "he", "Hebrew"),
    entry("her", "", "hz", "Herero"),
    entry("hil", "", "", "Hiligaynon"),
    entry("him", "", "", "Himachali languages"),
    entry("hin", "", "hi", "Hindi"),
    entry("hit", "", "", "Hittite"),
    entry("hmn", "", "", "Hmong"),
    entry("hmo", "", "ho", "Hiri Motu"),
    entry("hrv", "", "hr", "Croatian"),
    entry("hsb", "", "", "Upper Sorbian"),
    entry("hun", "", "hu", "Hungarian"),
    entry("hup", "", "", "Hupa"),
    entry("iba", "", "", "Iban"),
    entry("ibo", "", "ig", "Igbo"),
    entry("ice", "isl", "is", "Icelandic"),
    entry("ido", "", "io", "Ido"),
    entry("iii", "", "ii", "Sichuan Yi"),
    entry("ijo", "", "", "Ijo languages"),
    entry("iku", "", "iu", "Inuktitut"),
    entry("ile", "", "ie", "Interlingue"),
    entry("ilo", "", "", "Iloko"),
    entry("ina", "", "ia", "Interlingua"),
    entry("inc", "", "", "Indic languages"),
    entry("ind", "", "id", "Indonesian"),
    entry("ine", "", "", "Indo-European languages"),
    entry("inh", "", "", "Ingush"),
    entry("ipk", "", "ik", "Inupiaq"),
    entry("ira", "", "", "Iranian languages"),
    entry("iro", "", "", "Iroquoian languages"),
    entry("ita", "", "it", "Italian"),
    entry("jav", "", "jv", "Javanese"),
    entry("jbo", "", "", "Lojban"),
    entry("jpn", "", "ja", "Japanese"),
    entry("jpr", "", "", "Judeo-Persian"),
    entry("jrb", "", "", "Judeo-Arabic"),
    entry("kaa", "", "", "Kara-Kalpak"),
    entry("kab", "", "", "Kabyle"),
    entry("kac", "", "", "Kachin"),
    entry("kal", "", "kl", "Kalaallisut"),
    entry("kam", "", "", "Kamba"),
    entry("kan", "", "kn", "Kannada"),
    entry("kar", "", "", "Karen languages"),
    entry("kas", "", "ks", "Kashmiri"),
    entry("kau", "", "kr", "Kanuri"),
    entry("kaw", "", "", "Kawi"),
    entry("kaz", "", "kk", "Kazakh"),
    entry("kbd", "", "", "Kabardian"),
    entry("kha", "", "", "Khasi"),
    entry("khi", "", "", "Khoisan languages"),
    entry("khm", "", "km", "Central Khmer"),
    entry("kho", "", "", "Khotanese"),
    entry("kik", "", "ki", "Kikuyu"),
    entry("kin", "", "rw", "Kinyarwanda"),
    entry("kir", "", "ky", "Kirghiz"),
    entry("kmb", "", "", "Kimbundu"),
    entry("kok", "", "", "Konkani"),
    entry("kom", "", "kv", "Komi"),
    entry("kon", "", "kg", "Kongo"),
    entry("kor", "", "ko", "Korean"),
    entry("kos", "", "", "Kosraean"),
    entry("kpe", "", "", "Kpelle"),
    entry("krc", "", "", "Karachay-Balkar"),
    entry("krl", "", "", "Karelian"),
    entry("kro", "", "", "Kru languages"),
    entry("kru", "", "", "Kurukh"),
    entry("kua", "", "kj", "Kuanyama"),
    entry("kum", "", "", "Kumyk"),
    entry("kur", "", "ku", "Kurdish"),
    entry("kut", "", "", "Kutenai"),
    entry("lad", "", "", "Ladino"),
    entry("lah", "", "", "Lahnda"),
    entry("lam", "", "", "Lamba"),
    entry("lao", "", "lo", "Lao"),
    entry("lat", "", "la", "Latin"),
    entry("lav", "", "lv", "Latvian"),
    entry("lez", "", "", "Lezghian"),
    entry("lim", "", "li", "Limburgan"),
    entry("lin", "", "ln", "Lingala"),
    entry("lit", "", "lt", "Lithuanian"),
    entry("lol", "", "", "Mongo"),
    entry("loz", "", "", "Lozi"),
    entry("ltz", "", "lb", "Luxembourgish"),
    entry("lua", "", "", "Luba-Lulua"),
    entry("lub", "", "lu", "Luba-Katanga"),
    entry("lug", "", "lg", "Ganda"),
    entry("lui", "", "", "Luiseno"),
    entry("lun", "", "", "Lunda"),
    entry("luo", "", "", "Luo (Kenya and Tanzania)"),
    entry("lus", "", "", "Lushai"),
    entry("mac", "mkd", "mk", "Macedonian"),
    entry("mad", "", "", "Madurese"),
    entry("mag", "", "", "Magahi"),
    entry("mah", "", "mh", "Marshallese"),
    entry("mai", "", "", "Maithili"),
    entry("mak", "", "", "Makasar"),
    entry("mal", "", "ml", "Malayalam"),
    entry("man", "", "", "Mandingo"),
    entry("mao", "mri", "mi", "Maori"),
    entry("map", "", "", "Austronesian languages"),
    entry("mar", "", "mr", "Marathi"),
    entry("mas", "", "", "Masai"),
    entry("may", "msa", "ms", "Malay"),
    entry("mdf", "", "", "Moksha"),
    entry("mdr", "", "", "Mandar"),
    entry("men", "", "", "Mende"),
    entry("mga", "", "", "Irish, Middle (900-1200)"),
    entry("mic", "", "", "Mi'kmaq"),
    entry("min", "", "", "Minangkabau"),
    entry("mis", "", "", "Uncoded languages"),
    entry("mkh", "", "", "Mon-Khmer languages"),
    entry("mlg", "", "mg", "Malagasy"),
    entry("mlt", "", "mt", "Maltese"),
    entry("mnc", "", "", "Manchu"),
    entry("mni", "", "", "Manipuri"),
    entry("mno", "", "", "Manobo languages"),
    entry("moh", "", "", "Mohawk"),
    entry("mon", "", "mn", "Mongolian"),
    entry("mos", "", "", "Mossi"),
    entry("mul", "", "", "Multiple languages"),
    entry("mun", "", "", "Munda languages"),
    entry("mus", "", "", "Creek"),
    entry("mwl", "", "", "Mirandese"),
    entry("mwr", "", "", "Marwari"),
    entry("myn", "", "", "Mayan languages"),
    entry("myv", "", "", "Erzya"),
    entry("nah", "", "", "Nahuatl languages"),
    entry("nai", "", "", "North American Indian languages"),
    entry("nap", "", "", "Neapolitan"),
    entry("nau", "", "na", "Nauru"),
    entry("nav", "", "nv", "Navajo"),
    entry("nbl", "", "nr", "South Ndebele"),
    entry("nde", "", "nd", "North Ndebele"),
    entry("ndo", "", "ng", "Ndonga"),
    entry("nds", "", "", "Low German"),
    entry("nep", "", "ne", "Nepali"),
    entry("new", "", "", "Nepal Bhasa"),
    entry("nia", "", "", "Nias"),
    entry("nic", "", "", "Niger-Kordofanian languages"),
    entry("niu", "", "", "Niuean"),
    entry("nno", "", "nn", "Norwegian Nynorsk"),
    entry("nob", "", "nb", "Norwegian Bokmål"),
    entry("nog", "", "", "Nogai"),
    entry("non", "", "", "Norse, Old"),
    entry("nor", "", "no", "Norwegian"),
    entry("nqo", "", "", "N'Ko"),
    entry("nso", "", "", "Pedi"),
    entry("nub", "", "", "Nubian languages"),
    entry("nwc", "", "", "Classical Newari"),
    entry("nya", "", "ny", "Chichewa"),
    entry("nym", "", "", "Nyamwezi"),
    entry("nyn", "", "", "Nyankole"),
    entry("nyo", "", "", "Nyoro"),
    entry("nzi", "", "", "Nzima"),
    entry("oci", "", "oc", "Occitan (post 1500)"),
    entry("oji", "", "oj", "Ojibwa"),
    entry("ori", "", "or", "Oriya"),
    entry("orm", "", "om", "Oromo"),
    entry("osa", "", "", "Osage"),
    entry("oss", "", "os", "Ossetian"),
    entry("ota", "", "", "Turkish, Ottoman (1500-1928)"),
    entry("oto", "", "", "Otomian languages"),
    entry("paa", "", "", "Papuan languages"),
    entry("pag", "", "", "Pangasinan"),
    entry("pal", "", "", "Pahlavi"),
    entry("pam", "", "", "Pampanga"),
    entry("pan", "", "pa", "Panjabi"),
    entry("pap", "", "", "Papiamento"),
    entry("pau", "", "", "Palauan"),
    entry("peo", "", "", "Persian, Old (ca.600-400 B.C.)"),
    entry("per", "fas", "fa", "Persian"),
    entry("phi", "", "", "Philippine languages"),
    entry("phn", "", "", "Phoenician"),
    entry("pli", "", "pi", "Pali"),
    entry("pol", "", "pl", "Polish"),
    entry("pon", "", "", "Pohnpeian"),
    entry("por", "", "pt", "Portuguese"),
    entry("pra", "", "", "Prakrit languages"),
    entry("pro", "", "", "Provençal, Old (to 1500)"),
    entry("pus", "", "ps", "Pushto"),
    entry("que", "", "qu", "Quechua"),
    entry("raj", "", "", "Rajasthani"),
    entry("rap", "", "", "Rapanui"),
    entry("rar", "", "", "Rarotongan"),
    entry("roa", "", "", "Romance languages"),
    entry("roh", "", "rm", "Romansh"),
    entry("rom", "", "", "Romany"),
    entry("rum", "ron", "ro", "Romanian"),
    entry("run", "", "rn", "Rundi"),
    entry("rup", "", "", "Aromanian"),
    entry("rus", "", "ru", "Russian"),
    entry("sad", "", "", "Sandawe"),
    entry("sag", "", "sg", "Sango"),
    entry("sah", "", "", "Yakut"),
    entry("sai", "", "", "South American Indian languages"),
    entry("sal", "", "", "Salishan languages"),
    entry("sam", "", "", "Samaritan Aramaic"),
    entry("san", "", "sa", "Sanskrit"),
    entry("sas", "", "", "Sasak"),
    entry("sat", "", "", "Santali"),
    entry("scn", "", "", "Sicilian"),
    entry("sco", "", "", "Scots"),
    entry("sel", "", "", "Selkup"),
    entry("sem", "", "", "Semitic languages"),
    entry("sga", "", "", "Irish, Old (to 900)"),
    entry("sgn", "", "", "Sign Languages"),
    entry("shn", "", "", "Shan"),
    entry("sid", "", "", "Sidamo"),
    entry("sin", "", "si", "Sinhala"),
    entry("sio", "", "", "Siouan languages"),
    entry("sit", "", "", "Sino-Tibetan languages"),
    entry("sla", "", "", "Slavic languages"),
    entry("slo", "slk", "sk", "Slovak"),
    entry("slv", "", "sl", "Slovenian"),
    entry("sma", "", "", "Southern Sami"),
    entry("sme", "", "se", "Northern Sami"),
    entry("smi", "", "", "Sami languages"),
    entry("smj", "", "", "Lule Sami"),
    entry("smn", "", "", "Inari Sami"),
    entry("smo", "", "sm", "Samoan"),
    entry("sms", "", "", "Skolt Sami"),
    entry("sna", "", "sn", "Shona"),
    entry("snd", "", "sd", "Sindhi"),
    entry("snk", "", "", "Soninke"),
    entry("sog", "", "", "Sogdian"),
    entry("som", "", "so", "Somali"),
    entry("son", "", "", "Songhai languages"),
    entry("sot", "", "st", "Sotho, Southern"),
    entry("spa", "", "es", "Spanish"),
    entry("srd", "", "sc", "Sardinian"),
    entry("srn", "", "", "Sranan Tongo"),
    entry("srp", "", "sr", "Serbian"),
    entry("srr", "", "", "Serer"),
    entry("ssa", "", "", "Nilo-Saharan languages"),
    entry("ssw", "", "ss", "Swati"),
    entry("suk", "", "", "Sukuma"),
    entry("sun", "", "su", "Sundanese"),
    entry("sus", "", "", "Susu"),
    entry("sux", "", "", "Sumerian"),
    entry("swa", "", "sw", "Swahili"),
    entry("swe", "", "sv", "Swedish"),
    entry("syc", "", "", "Classical Syriac"),
    entry("syr", "", "", "Syriac"),
    entry("tah", "", "ty", "Tahitian"),
    entry("tai", "", "", "Tai languages"),
    entry("tam", "", "ta", "Tamil"),
    entry("tat", "", "tt", "Tatar"),
    entry("tel", "", "te", "Telugu"),
    entry("tem", "", "", "Timne"),
    entry("ter", "", "", "Tereno"),
    entry("tet", "", "", "Tetum"),
    entry("tgk", "", "tg", "Tajik"),
    entry("tgl", "", "tl", "Tagalog"),
    entry("tha", "", "th", "Thai"),
    entry("tib", "bod", "bo", "Tibetan"),
    entry("tig", "", "", "Tigre"),
    entry("tir", "", "ti", "Tigrinya"),
    entry("tiv", "", "", "Tiv"),
    entry("tkl", "", "", "Tokelau"),
    entry("tlh", "", "", "Klingon"),
    entry("tli", "", "", "Tlingit"),
    entry("tmh", "", "", "Tamashek"),
    entry("tog", "", "", "Tonga (Nyasa)"),
    entry("ton", "", "to", "Tonga (Tonga Islands)"),
    entry("tpi", "", "", "Tok Pisin"),
    entry("tsi", "", "", "Tsimshian"),
    entry("tsn", "", "tn", "Tswana"),
    entry("tso", "", "ts", "Tsonga"),
    entry("tuk", "", "tk", "Turkmen"),
    entry("tum", "", "", "Tumbuka"),
    entry("tup", "", "", "Tupi languages"),
    entry("tur", "", "tr", "Turkish"),
    entry("tut", "", "", "Altaic languages"),
    entry("tvl", "", "", "Tuvalu"),
    entry("twi", "", "tw", "Twi"),
    entry("tyv", "", "", "Tuvinian"),
    entry("udm", "", "", "Udmurt"),
    entry("uga", "", "", "Ugaritic"),
    entry("uig", "", "ug", "Uighur"),
    entry("ukr", "", "uk", "Ukrainian"),
    entry("umb", "", "", "Umbundu"),
    entry("und", "", "", "Undetermined"),
    entry("urd", "", "ur", "Urdu"),
    entry("uzb", "", "uz", "Uzbek"),
    entry("vai", "", "", "Vai"),
    entry("ven", "", "ve", "Venda"),
    entry("vie", "", "vi", "Vietnamese"),
    entry("vol", "", "vo", "Volapük"),
    entry("vot", "", "", "Votic"),
    entry("wak", "", "", "Wakashan languages"),
    entry("wal", "", "", "Wolaitta"),
    entry("war", "", "", "Waray"),
    entry("was", "", "", "Washo"),
    entry("wel", "cym", "cy", "Welsh"),
    entry("wen", "", "", "Sorbian languages"),
    entry("wln", "", "wa", "Walloon"),
    entry("wol", "", "wo", "Wolof"),
    entry("xal", "", "", "Kalmyk"),
    entry("xho", "", "xh", "Xhosa"),
    entry("yao", "", "", "Yao"),
    entry("yap", "", "", "Yapese"),
    entry("yid", "", "yi", "Yiddish"),
    entry("yor", "", "yo", "Yoruba"),
    entry("ypk", "", "", "Yupik languages"),
    entry("zap", "", "", "Zapotec"),
    entry("zbl", "", "", "Blissymbols"),
    entry("zen", "", "", "Zenaga"),
    entry("zgh", "", "", "Standard Moroccan Tamazight"),
    entry("zha", "", "za", "Zhuang"),
    entry("znd", "", "", "Zande languages"),
    entry("zul", "", "zu", "Zulu"),
    entry("zun", "", "", "Zuni"),
    entry("zxx", "", "", "No linguistic content"),
    entry("zza", "", "", "Zaza"),
];

static BY_PART1: Lazy<HashMap<&'static str, &'static LanguageEntry>> = Lazy::new(|| {
    LANGUAGES
        .iter()
        .filter_map(|e| e.part1.map(|code| (code, e)))
        .collect()
});

static BY_PART2: Lazy<HashMap<&'static str, &'static LanguageEntry>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(LANGUAGES.len() + 32);
    for e in LANGUAGES {
        index.insert(e.part2b, e);
        if let Some(t) = e.part2t {
            index.insert(t, e);
        }
    }
    index
});

/// All known languages, in registry order
pub fn entries() -> &'static [LanguageEntry] {
    LANGUAGES
}

fn lookup(code: &str, standard: IsoStandard) -> Option<&'static LanguageEntry> {
    let code = code.trim().to_ascii_lowercase();
    match standard {
        IsoStandard::Part1 if code.len() == 2 => BY_PART1.get(code.as_str()).copied(),
        IsoStandard::Part2 if code.len() == 3 => BY_PART2.get(code.as_str()).copied(),
        _ => None,
    }
}

/// Classify a token under ISO 639-1 and ISO 639-2
pub fn classify(code: &str) -> Classification {
    let part1 = lookup(code, IsoStandard::Part1);
    let part2 = lookup(code, IsoStandard::Part2);

    match (part1, part2) {
        (Some(a), Some(b)) => {
            log::debug!(
                "code {:?} is valid under both ISO 639-1 ({}) and ISO 639-2 ({}); using 639-2",
                code,
                a.name,
                b.name
            );
            Classification {
                standard: CodeStandard::Part2,
                name: Some(b.name),
            }
        }
        (None, Some(b)) => Classification {
            standard: CodeStandard::Part2,
            name: Some(b.name),
        },
        (Some(a), None) => Classification {
            standard: CodeStandard::Part1,
            name: Some(a.name),
        },
        (None, None) => Classification {
            standard: CodeStandard::Unrecognized,
            name: None,
        },
    }
}

/// Convert a code between standards
///
/// ISO 639-2 output uses the bibliographic form.
pub fn convert(code: &str, from: IsoStandard, to: IsoStandard) -> Option<String> {
    let language = lookup(code, from)?;
    match to {
        IsoStandard::Part1 => language.part1.map(str::to_string),
        IsoStandard::Part2 => Some(language.part2b.to_string()),
    }
}

/// English name for a code of either standard
pub fn name_of(code: &str) -> Option<&'static str> {
    classify(code).name
}

/// Normalize any recognized code to its ISO 639-1 form
pub fn to_part1(code: &str) -> Option<&'static str> {
    lookup(code, IsoStandard::Part1)
        .or_else(|| lookup(code, IsoStandard::Part2))
        .and_then(|e| e.part1)
}

/// Judge a token against the requested standard
pub fn judge(code: &str, expected: IsoStandard) -> CodeVerdict {
    let found = classify(code);
    let suggestion = match found.standard.as_iso() {
        Some(standard) if standard != expected => convert(code, standard, expected),
        _ => None,
    };
    CodeVerdict {
        found,
        expected,
        suggestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_part1() {
        let c = classify("en");
        assert_eq!(c.standard, CodeStandard::Part1);
        assert_eq!(c.name, Some("English"));
        assert_eq!(classify("NL").standard, CodeStandard::Part1);
    }

    #[test]
    fn test_classify_part2_both_forms() {
        assert_eq!(classify("eng").standard, CodeStandard::Part2);
        assert_eq!(classify("fre").standard, CodeStandard::Part2);
        assert_eq!(classify("fra").standard, CodeStandard::Part2);
        assert_eq!(classify("ger").name, Some("German"));
        assert_eq!(classify("deu").name, Some("German"));
        // No ISO 639-1 equivalent
        assert_eq!(classify("haw").standard, CodeStandard::Part2);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(classify("").standard, CodeStandard::Unrecognized);
        assert_eq!(classify("xx").standard, CodeStandard::Unrecognized);
        assert_eq!(classify("english").standard, CodeStandard::Unrecognized);
        assert_eq!(classify("720p").standard, CodeStandard::Unrecognized);
        assert_eq!(classify("e").name, None);
    }

    #[test]
    fn test_convert_between_standards() {
        assert_eq!(convert("en", IsoStandard::Part1, IsoStandard::Part2).as_deref(), Some("eng"));
        assert_eq!(convert("fr", IsoStandard::Part1, IsoStandard::Part2).as_deref(), Some("fre"));
        assert_eq!(convert("deu", IsoStandard::Part2, IsoStandard::Part1).as_deref(), Some("de"));
        assert_eq!(convert("dut", IsoStandard::Part2, IsoStandard::Part1).as_deref(), Some("nl"));
        assert_eq!(convert("haw", IsoStandard::Part2, IsoStandard::Part1), None);
        assert_eq!(convert("zz", IsoStandard::Part1, IsoStandard::Part2), None);
    }

    #[test]
    fn test_judge_suggests_cross_mapping() {
        let verdict = judge("en", IsoStandard::Part2);
        assert!(!verdict.is_compliant());
        assert_eq!(verdict.suggestion.as_deref(), Some("eng"));

        let verdict = judge("eng", IsoStandard::Part2);
        assert!(verdict.is_compliant());
        assert_eq!(verdict.suggestion, None);

        let verdict = judge("spa", IsoStandard::Part1);
        assert!(!verdict.is_compliant());
        assert_eq!(verdict.suggestion.as_deref(), Some("es"));
    }

    #[test]
    fn test_judge_unrecognized_has_no_suggestion() {
        let verdict = judge("", IsoStandard::Part1);
        assert!(!verdict.is_compliant());
        assert_eq!(verdict.found.standard, CodeStandard::Unrecognized);
        assert_eq!(verdict.suggestion, None);
    }

    #[test]
    fn test_to_part1() {
        assert_eq!(to_part1("fr"), Some("fr"));
        assert_eq!(to_part1("fre"), Some("fr"));
        assert_eq!(to_part1("fra"), Some("fr"));
        assert_eq!(to_part1("haw"), None);
        assert_eq!(to_part1("nope"), None);
    }

    #[test]
    fn test_iso_standard_from_str() {
        assert_eq!("1".parse::<IsoStandard>().unwrap(), IsoStandard::Part1);
        assert_eq!("639-2".parse::<IsoStandard>().unwrap(), IsoStandard::Part2);
        let err = "3".parse::<IsoStandard>().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_registry_codes_are_unique() {
        let mut part1 = std::collections::HashSet::new();
        let mut part2 = std::collections::HashSet::new();
        for e in entries() {
            assert_eq!(e.part2b.len(), 3);
            assert!(part2.insert(e.part2b), "duplicate code {}", e.part2b);
            if let Some(t) = e.part2t {
                assert!(part2.insert(t), "duplicate code {}", t);
            }
            if let Some(p1) = e.part1 {
                assert_eq!(p1.len(), 2);
                assert!(part1.insert(p1), "duplicate code {}", p1);
            }
        }
    }

    #[test]
    fn test_standard_serialization() {
        assert_eq!(serde_json::to_string(&IsoStandard::Part2).unwrap(), "\"2\"");
        assert_eq!(serde_json::to_string(&CodeStandard::Unrecognized).unwrap(), "\"none\"");
    }
}
