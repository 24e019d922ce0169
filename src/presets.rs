//! Built-in catalogs
//!
//! `salon()` is a complete hair salon catalog: barber and hairdressing
//! branches, extension services nested one level deeper, placeholder
//! categories that are not bookable yet, per-category specialist rosters and
//! every optional step enabled. The CLI exports it with `preset` and the
//! integration tests drive it end to end.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::catalog::{Capabilities, Catalog, FlowOption, Specialist, SpecialistRoster, Step};
use crate::types::{AssignmentMode, SelectionMode};

/// Root step of the salon catalog
pub const SALON_ROOT: &str = "root";

fn service(id: &str, label: &str, price: i64, minutes: u32, category: &str) -> FlowOption {
    FlowOption::leaf(id, label, Decimal::from(price), minutes).in_category(category)
}

fn specialist(id: &str, name: &str, rating: f32, first_available: (i32, u32, u32)) -> Specialist {
    let (year, month, day) = first_available;
    Specialist {
        id: id.to_string(),
        name: name.to_string(),
        rating,
        first_available: NaiveDate::from_ymd_opt(year, month, day),
    }
}

/// Two named specialists plus an "anyone available" entry
fn roster(category: &str, label: &str, people: [(&str, f32, u32); 2]) -> SpecialistRoster {
    let [(first, first_rating, first_day), (second, second_rating, second_day)] = people;
    SpecialistRoster {
        label: label.to_string(),
        specialists: vec![
            specialist(&format!("{category}-1"), first, first_rating, (2025, 9, first_day)),
            specialist(&format!("{category}-2"), second, second_rating, (2025, 9, second_day)),
            specialist(&format!("{category}-any"), "Anyone available", 0.0, (2025, 9, first_day)),
        ],
    }
}

/// The salon catalog
pub fn salon() -> Catalog {
    let steps = [
        Step::new(SALON_ROOT, "Choose your services", SelectionMode::Multi)
            .with_subtitle("Pick one or more categories")
            .with_option(
                FlowOption::branch("frizerie", "Barber", "frizerie-main")
                    .with_description("Cuts, beard, professional coloring"),
            )
            .with_option(
                FlowOption::branch("coafor", "Hairdressing", "coafor-main")
                    .with_description("Styling, extensions, professional treatments"),
            )
            .with_option(
                FlowOption::unavailable("manichiura-pedichiura", "Manicure & Pedicure")
                    .with_description("Coming soon"),
            )
            .with_option(FlowOption::unavailable("gene", "Lashes").with_description("Coming soon"))
            .with_option(FlowOption::unavailable("machiaj", "Makeup").with_description("Coming soon"))
            .with_option(
                FlowOption::unavailable("cosmetica", "Cosmetics").with_description("Coming soon"),
            )
            .with_option(
                FlowOption::unavailable("permanent-makeup", "Permanent make-up")
                    .with_description("Coming soon"),
            ),
        // Barber
        Step::new("frizerie-main", "Barber", SelectionMode::Multi)
            .with_subtitle("Choose the service categories you want")
            .with_option(
                FlowOption::branch("frizerie-tuns", "Haircut", "frizerie-tuns")
                    .with_description("Cuts and styling"),
            )
            .with_option(
                FlowOption::branch("frizerie-barba", "Beard", "frizerie-barba")
                    .with_description("Trim and line-up"),
            )
            .with_option(
                FlowOption::branch("frizerie-vopsit", "Coloring", "frizerie-vopsit")
                    .with_description("Color options"),
            ),
        Step::new("frizerie-tuns", "Haircut (pick one)", SelectionMode::Single)
            .with_option(service("tuns-simplu", "Simple cut", 70, 30, "frizerie-tuns"))
            .with_option(service("tuns-styling", "Cut + styling", 100, 45, "frizerie-tuns"))
            .with_option(service(
                "tuns-spalat-styling",
                "Cut + wash + styling",
                130,
                60,
                "frizerie-tuns",
            )),
        Step::new("frizerie-barba", "Beard (pick one)", SelectionMode::Single)
            .with_option(service("barba-simpla", "Simple beard", 50, 20, "frizerie-barba"))
            .with_option(service("barba-contur", "Beard + line-up", 70, 30, "frizerie-barba")),
        Step::new("frizerie-vopsit", "Coloring (pick one)", SelectionMode::Single)
            .with_option(service("vopsit-par", "Hair color", 180, 60, "frizerie-vopsit"))
            .with_option(service("vopsit-barba", "Beard color", 90, 30, "frizerie-vopsit"))
            .with_option(service(
                "vopsit-par-barba",
                "Hair + beard color",
                260,
                90,
                "frizerie-vopsit",
            )),
        // Hairdressing
        Step::new("coafor-main", "Hairdressing", SelectionMode::Multi)
            .with_subtitle("Pick one or more categories")
            .with_option(
                FlowOption::branch("coafor-coafat", "Styling", "coafor-coafat")
                    .with_description("Styling for any occasion"),
            )
            .with_option(
                FlowOption::branch("coafor-extensii", "Extensions", "coafor-extensii")
                    .with_description("Fitting, maintenance and removal"),
            )
            .with_option(
                FlowOption::branch("coafor-tratamente", "Treatments", "coafor-tratamente")
                    .with_description("Intensive hair therapy"),
            )
            .with_option(
                FlowOption::branch("coafor-tuns", "Haircut", "coafor-tuns")
                    .with_description("Maintenance and reshaping"),
            ),
        Step::new("coafor-coafat", "Styling (pick one)", SelectionMode::Single)
            .with_option(service(
                "coafat-par-scurt",
                "Wash + style, short hair (to the chin)",
                190,
                60,
                "coafor-coafat",
            ))
            .with_option(service(
                "coafat-par-mediu",
                "Wash + style, medium hair (to the shoulders)",
                250,
                75,
                "coafor-coafat",
            ))
            .with_option(service(
                "coafat-par-lung",
                "Wash + style, long hair (below the shoulders)",
                320,
                90,
                "coafor-coafat",
            ))
            .with_option(service("coafat-ocazie", "Occasion styling", 380, 110, "coafor-coafat"))
            .with_option(service("coafat-mireasa", "Bridal styling", 520, 150, "coafor-coafat")),
        Step::new("coafor-extensii", "Extensions (pick one)", SelectionMode::Single)
            .with_option(
                FlowOption::branch("coafor-extensii-montat", "Extension fitting", "coafor-extensii-montat")
                    .with_description("Choose the fitting method"),
            )
            .with_option(
                FlowOption::branch(
                    "coafor-extensii-intretinere",
                    "Extension maintenance",
                    "coafor-extensii-intretinere",
                )
                .with_description("Regular extension service"),
            )
            .with_option(
                FlowOption::branch(
                    "coafor-extensii-indepartare",
                    "Extension removal",
                    "coafor-extensii-indepartare",
                )
                .with_description("Safe removal"),
            ),
        Step::new("coafor-extensii-montat", "Extension fitting (pick one)", SelectionMode::Single)
            .with_option(service("montat-tape-on", "Tape-on", 700, 180, "coafor-extensii"))
            .with_option(service("montat-microring", "Microring / Keratin", 900, 210, "coafor-extensii"))
            .with_option(service(
                "montat-extensii-proprii",
                "Your own extensions",
                600,
                150,
                "coafor-extensii",
            )),
        Step::new(
            "coafor-extensii-intretinere",
            "Extension maintenance (pick one)",
            SelectionMode::Single,
        )
        .with_option(service("intretinere-1-pachet", "1 pack (light volume)", 250, 90, "coafor-extensii"))
        .with_option(service(
            "intretinere-2-pachete",
            "2 packs (volume + medium length)",
            400,
            120,
            "coafor-extensii",
        ))
        .with_option(service(
            "intretinere-3-plus-pachete",
            "3+ packs (very long or thick hair)",
            550,
            150,
            "coafor-extensii",
        )),
        Step::new(
            "coafor-extensii-indepartare",
            "Extension removal (pick one)",
            SelectionMode::Single,
        )
        .with_option(service("indepartare-tape-on", "Tape-on", 200, 60, "coafor-extensii"))
        .with_option(service("indepartare-microring", "Microring / Keratin", 300, 90, "coafor-extensii")),
        Step::new("coafor-tratamente", "Treatments (pick one)", SelectionMode::Single)
            .with_option(service("tratament-911-quinoa", "911 Quinoa Revival", 220, 60, "coafor-tratamente"))
            .with_option(service(
                "tratament-kerastase-booster",
                "Kérastase Booster",
                250,
                45,
                "coafor-tratamente",
            ))
            .with_option(service("tratament-tahe-botox", "Tahe Botox", 320, 75, "coafor-tratamente"))
            .with_option(service(
                "tratament-joico-kpak",
                "Joico K-Pak (4 steps)",
                350,
                90,
                "coafor-tratamente",
            ))
            .with_option(service("tratament-wellaplex", "Wellaplex", 280, 60, "coafor-tratamente")),
        Step::new("coafor-tuns", "Haircut (pick one)", SelectionMode::Single)
            .with_option(service("coafor-tuns-varfuri", "Trim", 120, 45, "coafor-tuns"))
            .with_option(service("coafor-tuns-forma", "Reshape", 180, 60, "coafor-tuns")),
    ];

    Catalog::new(SALON_ROOT, steps)
        .with_capabilities(Capabilities {
            assignment: Some(AssignmentMode::PerCategory),
            scheduling: true,
            contact: true,
        })
        .with_roster(
            "frizerie-tuns",
            roster("frizerie-tuns", "Haircut", [("Andrei Popescu", 4.9, 24), ("Mihai Dinu", 4.7, 25)]),
        )
        .with_roster(
            "frizerie-barba",
            roster("frizerie-barba", "Beard", [("Alex Marinescu", 4.8, 26), ("Radu Călinescu", 4.6, 27)]),
        )
        .with_roster(
            "frizerie-vopsit",
            roster(
                "frizerie-vopsit",
                "Coloring",
                [("Ioana Dumitrescu", 4.9, 28), ("Ana Marinescu", 4.7, 29)],
            ),
        )
        .with_roster(
            "coafor-coafat",
            roster("coafor-coafat", "Styling", [("Irina Tudor", 4.9, 25), ("Simona Ilie", 4.8, 26)]),
        )
        .with_roster(
            "coafor-extensii",
            roster(
                "coafor-extensii",
                "Extensions",
                [("Bianca Ionescu", 4.9, 27), ("Teodora Luca", 4.7, 28)],
            ),
        )
        .with_roster(
            "coafor-tratamente",
            roster(
                "coafor-tratamente",
                "Treatments",
                [("Carla Enache", 4.9, 24), ("Daria Anton", 4.8, 25)],
            ),
        )
        .with_roster(
            "coafor-tuns",
            roster("coafor-tuns", "Haircut", [("Cristina Radu", 4.8, 23), ("Laura Mitroi", 4.7, 24)]),
        )
}
