//! Auto-generation of role templates from a production's title (C3).
//!
//! Every production always gets a conductor role. The remaining roles are
//! looked up from a fixed table of known productions, matched by substring
//! against the lowercased title; an unrecognized title falls back to a
//! generic lead/supporting cast.

use crate::model::{Production, Role};

type Cast = &'static [(&'static str, &'static str)];

/// `(keywords, [(id_suffix, name)])` entries, checked in order. The first
/// matching entry wins, matching the precedence of the original lookup.
const TEMPLATES: &[(&[&str], Cast)] = &[
    (
        &["щелкунчик", "nutcracker"],
        &[
            ("clara", "Клара"),
            ("prince", "Принц"),
            ("drosselmeyer", "Дроссельмейер"),
            ("mouse_king", "Мышиный король"),
            ("sugar_plum", "Фея Драже"),
        ],
    ),
    (
        &["аида", "aida"],
        &[
            ("aida", "Аида"),
            ("radames", "Радамес"),
            ("amneris", "Амнерис"),
            ("amonasro", "Амонасро"),
            ("ramfis", "Рамфис"),
        ],
    ),
    (
        &["лебединое", "swan"],
        &[
            ("odette", "Одетта"),
            ("odile", "Одиллия"),
            ("prince_siegfried", "Принц Зигфрид"),
            ("rothbart", "Ротбарт"),
            ("queen", "Королева"),
        ],
    ),
    (
        &["онегин", "onegin"],
        &[
            ("onegin", "Онегин"),
            ("tatiana", "Татьяна"),
            ("lenski", "Ленский"),
            ("olga", "Ольга"),
            ("gremin", "Гремин"),
        ],
    ),
    (
        &["кармен", "carmen"],
        &[
            ("carmen", "Кармен"),
            ("don_jose", "Дон Хосе"),
            ("escamillo", "Эскамильо"),
            ("micaela", "Микаэла"),
        ],
    ),
    (
        &["спящая", "sleeping"],
        &[
            ("aurora", "Аврора"),
            ("prince_desire", "Принц Дезире"),
            ("lilac_fairy", "Фея Сирени"),
            ("carabosse", "Карабосс"),
            ("king", "Король"),
        ],
    ),
    (
        &["риголетто", "rigoletto"],
        &[
            ("rigoletto", "Риголетто"),
            ("gilda", "Джильда"),
            ("duke", "Герцог Мантуанский"),
            ("sparafucile", "Спарафучиле"),
            ("maddalena", "Маддалена"),
        ],
    ),
    (
        &["адриана", "adriana"],
        &[
            ("adriana", "Адриана Лекуврёр"),
            ("maurizio", "Маурицио"),
            ("princess", "Принцесса де Буйон"),
            ("michonnet", "Мишонне"),
        ],
    ),
    (
        &["петрушка", "petrushka"],
        &[
            ("petrushka", "Петрушка"),
            ("ballerina", "Балерина"),
            ("moor", "Мавр"),
            ("magician", "Фокусник"),
        ],
    ),
    (
        &["мертвые", "души"],
        &[
            ("chichikov", "Чичиков"),
            ("manilov", "Манилов"),
            ("korobochka", "Коробочка"),
            ("nozdrev", "Ноздрёв"),
            ("sobolievich", "Соболевич"),
        ],
    ),
    (
        &["симон", "бокканегра", "boccanegra"],
        &[
            ("simon", "Симон Бокканегра"),
            ("amelia", "Амелия"),
            ("gabriele", "Габриэле Адорно"),
            ("fiesco", "Фьеско"),
        ],
    ),
    (
        &["ромео", "джульетта", "romeo"],
        &[
            ("romeo", "Ромео"),
            ("juliet", "Джульетта"),
            ("mercutio", "Меркуцио"),
            ("tybalt", "Тибальт"),
            ("friar", "Лоренцо"),
        ],
    ),
    (
        &["салтан", "saltyk"],
        &[
            ("tsar", "Царь Салтан"),
            ("tsarina", "Царица"),
            ("guidon", "Гвидон"),
            ("swan", "Царевна-Лебедь"),
        ],
    ),
    (
        &["жизель", "giselle"],
        &[
            ("giselle", "Жизель"),
            ("albrecht", "Альбрехт"),
            ("hilarion", "Гиларион"),
            ("myrtha", "Мирта"),
        ],
    ),
    (
        &["мастер", "маргарита"],
        &[
            ("master", "Мастер"),
            ("margarita", "Маргарита"),
            ("woland", "Воланд"),
            ("yeshua", "Иешуа"),
        ],
    ),
    (
        &["иоланта", "iolanta"],
        &[
            ("iolanta", "Иоланта"),
            ("vautdemont", "Водемон"),
            ("king", "Король Рене"),
            ("robert", "Роберт"),
        ],
    ),
    (
        &["женщины", "cosi"],
        &[
            ("fiordiligi", "Фьордилиджи"),
            ("dorabella", "Дорабелла"),
            ("ferrando", "Феррандо"),
            ("guglielmo", "Гульельмо"),
        ],
    ),
    (
        &["ручей", "stream"],
        &[
            ("zya", "Зина"),
            ("pyotr", "Пётр"),
            ("ballerina_guest", "Балерина-гостья"),
        ],
    ),
    (
        &["невидимом", "граде"],
        &[
            ("fyodor", "Фёдор"),
            ("fevronia", "Феврония"),
            ("grishka", "Гришка"),
        ],
    ),
    (
        &["снегурочка", "snow"],
        &[
            ("snegurochka", "Снегурочка"),
            ("mizgir", "Мизгирь"),
            ("lial", "Лель"),
            ("spring", "Весна"),
        ],
    ),
    (
        &["сорочинская", "ярмарка"],
        &[
            ("gritsko", "Грицько"),
            ("parasya", "Парася"),
            ("cherevik", "Черевик"),
        ],
    ),
    (
        &["мандарин", "mandarin"],
        &[("mandarin_son", "Сын мандарина"), ("princess", "Принцесса")],
    ),
    (
        &["ариадна", "ariadne"],
        &[
            ("ariadne", "Ариадна"),
            ("bacchus", "Бахус"),
            ("zerbinetta", "Цербинетта"),
        ],
    ),
    (
        &["петя", "волк", "peter"],
        &[
            ("peter", "Петя"),
            ("grandfather", "Дедушка"),
            ("bird", "Птичка"),
            ("duck", "Утка"),
        ],
    ),
    (
        &["повесы", "rake"],
        &[
            ("tom", "Том Рейквелл"),
            ("anne", "Энн Трулав"),
            ("nick", "Ник Шэдоу"),
        ],
    ),
    (
        &["питер пэн", "peter pan"],
        &[
            ("peter_pan", "Питер Пэн"),
            ("wendy", "Венди"),
            ("captain", "Капитан Крюк"),
            ("tinker", "Динь-Динь"),
        ],
    ),
    (
        &["король", "king"],
        &[
            ("king_main", "Король"),
            ("queen_main", "Королева"),
            ("prince_main", "Принц"),
        ],
    ),
];

const DEFAULT_ROLES: &[(&str, &str)] = &[
    ("lead_male", "Главная мужская роль"),
    ("lead_female", "Главная женская роль"),
    ("supporting_male", "Второстепенная мужская роль"),
    ("supporting_female", "Второстепенная женская роль"),
];

/// Generates the role list for a production, always including a conductor.
pub fn generate_roles_for_production(production: &Production) -> Vec<Role> {
    let title_lower = production.title.to_lowercase();

    let mut roles = vec![Role {
        id: format!("{}_conductor", production.id),
        name: "Дирижер".to_string(),
        production_id: production.id.clone(),
        is_conductor: true,
        required_count: 1,
    }];

    let cast = TEMPLATES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| title_lower.contains(kw)))
        .map(|(_, roles)| *roles)
        .unwrap_or(DEFAULT_ROLES);

    for (suffix, name) in cast {
        roles.push(Role {
            id: format!("{}_{}", production.id, suffix),
            name: name.to_string(),
            production_id: production.id.clone(),
            is_conductor: false,
            required_count: 1,
        });
    }

    roles
}
