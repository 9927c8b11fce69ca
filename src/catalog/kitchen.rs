//! Built-in kitchen room.

use std::collections::BTreeMap;

use super::{BakedSlot, Catalog, Category, RoomModel, TextureVariant};

/// Model location.
pub const MODEL_PATH: &str = "/models/bellos_kitchen_v16.glb";
/// Environment panorama location.
pub const HDR_PATH: &str = "/hdr/kitchen.hdr";

type Row = (&'static str, &'static str, &'static str, &'static str, &'static str);

const BAKED: [(BakedSlot, &str); 7] = [
    (BakedSlot::StaticWalls, "/textures/kitchen/static/Kitchen_Static_Walls.webp"),
    (BakedSlot::Cupboards, "/textures/kitchen/static/Kitchen_Cupboards.webp"),
    (BakedSlot::Coffee, "/textures/kitchen/static/Kitchen_Coffee.webp"),
    (BakedSlot::Cooker, "/textures/kitchen/static/Kitchen_Cooker.webp"),
    (BakedSlot::Hob, "/textures/kitchen/static/Kitchen_Hob.webp"),
    (BakedSlot::Sink, "/textures/kitchen/static/Kitchen_Sink.webp"),
    (BakedSlot::WindowFrame, "/textures/kitchen/static/Kitchen_WindowFrame.webp"),
];

// (id, name, texture, thumbnail, product)
const FLOOR: [Row; 17] = [
    ("floor-amani-marble-dark-grey-1200x1200", "Amani Marble Dark Grey", "/textures/kitchen/floor/fl_amani_marble_dark_grey_1200x1200.webp", "/thumbnails/kitchen/floor/amani_marble_dark_grey_1200x1200.webp", "/products/amani-marble-dark-grey-1200x1200"),
    ("floor-amani-marble-light-grey-1200x1200", "Amani Marble Light Grey", "/textures/kitchen/floor/fl_amani_marble_light_grey_1200x1200.webp", "/thumbnails/kitchen/floor/amani_marble_light_grey_1200x1200.webp", "/products/amani-marble-light-grey-1200x1200"),
    ("breccia-adige-grey-1200x1200", "Breccia Adige Grey", "/textures/kitchen/floor/fl_breccia_adige_grey_1200x1200.webp", "/thumbnails/kitchen/floor/breccia_adige_1200x1200.webp", "/products/breccia-adige-grey-1200x1200"),
    ("floor-calacatta-africa-white-1200x1200", "Calacatta Africa White", "/textures/kitchen/floor/fl_calacatta_africa_white_1200x1200.webp", "/thumbnails/kitchen/floor/calacatta_africa_white_1200x1200.webp", "/products/calacatta-africa-white-1200x1200"),
    ("floor-calacatta-gold-white-1200x1200", "Calacatta Gold White", "/textures/kitchen/floor/fl_calacatta_gold_white_1200x1200.webp", "/thumbnails/kitchen/floor/calacatta_gold_white_1200x1200.webp", "/products/calacatta-gold-white-1200x1200"),
    ("floor-carmo-stone-anthracite-1200x1200", "Carmo Stone Anthracite", "/textures/kitchen/floor/fl_carmo_stone_anthracite_1200x1200.webp", "/thumbnails/kitchen/floor/carmo_stone_anthracite_1200x1200.webp", "/products/carmo-stone-anthracite-1200x1200"),
    ("floor-carmo-stone-black-1200x1200", "Carmo Stone Black", "/textures/kitchen/floor/fl_carmo_stone_black_1200x1200.webp", "/thumbnails/kitchen/floor/carmo_stone_black_1200x1200.webp", "/products/carmo-stone-black-1200x1200"),
    ("floor-carmo-stone-grey-1200x1200", "Carmo Stone Grey", "/textures/kitchen/floor/fl_carmo_stone_grey_1200x1200.webp", "/thumbnails/kitchen/floor/carmo_stone_grey_1200x1200.webp", "/products/carmo-stone-grey-1200x1200"),
    ("floor-carmo-stone-ivory-1200x1200", "Carmo Stone Ivory", "/textures/kitchen/floor/fl_carmo_stone_ivory_1200x1200.webp", "/thumbnails/kitchen/floor/carmo_stone_ivory_1200x1200.webp", "/products/carmo-stone-ivory-1200x1200"),
    ("floor-classic-cararrra-grey-1200x1200", "Classic Cararra Grey", "/textures/kitchen/floor/fl_classic_cararra_grey_1200x1200.webp", "/thumbnails/kitchen/floor/classic_cararra_grey_1200x1200.webp", "/products/classic-cararra-grey-1200x1200"),
    ("floor-medicea-marble-1200x1200", "Medicea Marble", "/textures/kitchen/floor/fl_medicea_marble_1200x1200.webp", "/thumbnails/kitchen/floor/medicea_marble_1200x1200.webp", "/products/medicea-marble-1200x1200"),
    ("floor-panda-marble-1200x1200", "Panda Marble", "/textures/kitchen/floor/fl_panda_marble_1200x1200.webp", "/thumbnails/kitchen/floor/panda_marble_1200x1200.webp", "/products/panda-marble-1200x1200"),
    ("floor-surface-2.0-ash-1200x1200", "Surface 2.0 Ash", "/textures/kitchen/floor/fl_surface_2.0_ash_1200x1200.webp", "/thumbnails/kitchen/floor/surface_2.0_ash_1200x1200.webp", "/products/surface-2.0-ash-1200x1200"),
    ("floor-surface-2.0-mid-grey-1200x1200", "Surface 2.0 Mid Grey", "/textures/kitchen/floor/fl_surface_2.0_mid_grey_1200x1200.webp", "/thumbnails/kitchen/floor/surface_2.0_mid_grey_1200x1200.webp", "/products/surface-2.0-mid-grey-1200x1200"),
    ("floor-surface-2.0-sand-1200x1200", "Surface 2.0 Sand", "/textures/kitchen/floor/fl_surface_2.0_sand_1200x1200.webp", "/thumbnails/kitchen/floor/surface_2.0_sand_1200x1200.webp", "/products/surface-2.0-sand-1200x1200"),
    ("floor-surface-2.0-cool-grey-1200x1200", "Surface 2.0 Cool Grey", "/textures/kitchen/floor/fl_surface_2.0_cool_grey_1200x1200.webp", "/thumbnails/kitchen/floor/surface_2.0_cool_grey_1200x1200.webp", "/products/surface-2.0-cool-grey-1200x1200"),
    ("floor-versilia-marble-1200x1200", "Versilia Marble", "/textures/kitchen/floor/fl_versilia_marble_1200x1200.webp", "/thumbnails/kitchen/floor/versilia_marble_1200x1200.webp", "/products/versilia-marble-1200x1200"),
];

const WORKTOP: [Row; 9] = [
    ("amani-marble-dark-grey", "Amani Marble Dark Grey", "/textures/kitchen/worktop/wt_amani_marble_dark_grey.webp", "/thumbnails/kitchen/worktop/wt_amani_marble_dark_grey.webp", "/products/#"),
    ("amani-marble-light-grey", "Amani Marble Light Grey", "/textures/kitchen/worktop/wt_amani_marble_light_grey.webp", "/thumbnails/kitchen/worktop/wt_amani_marble_light_grey.webp", "/products/amani-marble-light-grey-worktop"),
    ("calacatta-gold-white-worktop", "Calacatta Gold White", "/textures/kitchen/worktop/wt_calacatta_gold_white.webp", "/thumbnails/kitchen/worktop/wt_calacatta_gold_white.webp", "/products/#"),
    ("calacatta-africa-white-worktop", "Calacatta Africa White", "/textures/kitchen/worktop/wt_calacatta_africa_white.webp", "/thumbnails/kitchen/worktop/wt_calacatta_africa_white.webp", "/products/#"),
    ("breccia-adige-grey-worktop", "Breccia Adige Grey", "/textures/kitchen/worktop/wt_breccia_adige_grey.webp", "/thumbnails/kitchen/worktop/wt_breccia_adige_grey.webp", "/products/breccia-adige-grey-worktop"),
    ("medicea-marble-worktop", "Medicea Marble", "/textures/kitchen/worktop/wt_medicea_marble.webp", "/thumbnails/kitchen/worktop/wt_medicea_marble.webp", "/products/medicea-marble-worktop"),
    ("classic-cararra-grey-worktop", "Classic Carrara Grey", "/textures/kitchen/worktop/wt_classic_carrara_grey.webp", "/thumbnails/kitchen/worktop/wt_classic_carrara_grey.webp", "/products/#"),
    ("taj-mahal-worktop", "Taj Mahal", "/textures/kitchen/worktop/wt_taj_mahal.webp", "/thumbnails/kitchen/worktop/wt_taj_mahal.webp", "/products/#"),
    ("versilia-marble-worktop", "Versilia Marble", "/textures/kitchen/worktop/wt_versilia_marble.webp", "/thumbnails/kitchen/worktop/wt_versilia_marble.webp", "/products/#"),
];

// Wall thumbnails are the full textures.
const WALLS: [Row; 15] = [
    ("wall-amani_marble_dark_grey_600x1200", "Amani Marble Dark Grey", "/textures/kitchen/walls/wl_amani_marble_dark_grey_600x1200.webp", "/textures/kitchen/walls/wl_amani_marble_dark_grey_600x1200.webp", "/products/amani-marble-dark-grey-600x1200"),
    ("wall-amani_marble_light_grey_600x1200", "Amani Marble Light Grey", "/textures/kitchen/walls/wl_amani_marble_light_grey_600x1200.webp", "/textures/kitchen/walls/wl_amani_marble_light_grey_600x1200.webp", "/products/amani-marble-light-grey-600x1200"),
    ("wall-breccia_adige_grey_600x1200", "Breccia Adige Grey", "/textures/kitchen/walls/wl_breccia_adige_grey_600x1200.webp", "/textures/kitchen/walls/wl_amani_marble_light_grey_600x1200.webp", "/products/amani-marble-light-grey-600x1200"),
    ("wall-calacatta_africa_white_600x1200", "Calacatta Africa White", "/textures/kitchen/walls/wl_calacatta_africa_white_600x1200.webp", "/textures/kitchen/walls/wl_calacatta_africa_white_600x1200.webp", "/products/calacatta-africa-white-600x1200"),
    ("wall-calacatta_gold_white_600x1200", "Calacatta Gold White", "/textures/kitchen/walls/wl_calacatta_africa_white_600x1200.webp", "/textures/kitchen/walls/wl_calacatta_africa_white_600x1200.webp", "/products/calacatta-africa-white-600x1200"),
    ("wall-carmo-stone_anthracite_600x1200", "Carmo Stone Anthracite", "/textures/kitchen/walls/wl_carmo_stone_anthracite_600x1200.webp", "/textures/kitchen/walls/wl_carmo_stone_anthracite_600x1200.webp", "/products/carmo-stone-anthracite-600x1200"),
    ("wall-carmo-stone-grey-600x1200", "Carmo Stone Grey", "/textures/kitchen/walls/wl_carmo_stone_grey_600x1200.webp", "/textures/kitchen/walls/wl_carmo_stone_grey_600x1200.webp", "/products/carmo-stone-grey-600x1200"),
    ("wall-carmo-stone-ivory-600x1200", "Carmo Stone Ivory", "/textures/kitchen/walls/wl_carmo_stone_ivory_600x1200.webp", "/textures/kitchen/walls/wl_carmo_stone_ivory_600x1200.webp", "/products/carmo-stone-ivory-600x1200"),
    ("wall-classic-cararra-grey-600x1200", "Classic Cararra Grey", "/textures/kitchen/walls/wl_classic_carrara_grey_600x1200.webp", "/textures/kitchen/walls/wl_classic_cararra_grey_600x1200.webp", "/products/classic-cararra-grey-600x1200"),
    ("wall-medicea-marble-600x1200", "Medicea Marble", "/textures/kitchen/walls/wl_medicea_marble_600x1200.webp", "/textures/kitchen/walls/wl_medicea_marble_600x1200.webp", "/products/medicea-marble-600x1200"),
    ("wall-surface-2.0-ash-600x1200", "Surface 2.0 Ash", "/textures/kitchen/walls/wl_surface_2.0_ash_600x1200.webp", "/textures/kitchen/walls/wl_surface_2.0_ash_600x1200.webp", "/products/surface-2.0-ash-600x1200"),
    ("wall-surface-2.0-sand-600x1200", "Surface 2.0 Sand", "/textures/kitchen/walls/wl_surface_2.0_sand_600x1200.webp", "/textures/kitchen/walls/wl_surface_2.0_ash_600x1200.webp", "/products/surface-2.0-ash-600x1200"),
    ("wall-surface_xl_cool_grey_600x1200", "Surface XL Cool Grey", "/textures/kitchen/walls/wl_surface_xl_cool_grey_600x1200.webp", "/textures/kitchen/walls/wl_surface_xl_cool_grey_600x1200.webp", "/products/surface-2-0-cool-grey-600x1200"),
    ("wall-taj-mahal-600x1200", "Taj Mahal", "/textures/kitchen/walls/wl_taj_mahal_600x1200.webp", "/textures/kitchen/walls/wl_taj_mahal_600x1200.webp", "/products/taj-mahal-600x1200"),
    ("wall-versilia-marble-600x1200", "Versilia Marble", "/textures/kitchen/walls/wl_versilia_marble_600x1200.webp", "/textures/kitchen/walls/wl_versilia_marble_600x1200.webp", "/products/versilia-marble-600x1200"),
];

fn rows(category: Category, rows: &[Row]) -> impl Iterator<Item = TextureVariant> + '_ {
    rows.iter().map(move |&(id, name, texture, thumbnail, product)| {
        TextureVariant::new(category, id, name, texture, thumbnail, product)
    })
}

/// The built-in kitchen catalog.
#[must_use]
pub fn catalog() -> Catalog {
    let room = RoomModel {
        name: "Kitchen".to_owned(),
        slug: "kitchen".to_owned(),
        model_path: MODEL_PATH.to_owned(),
        environment_path: Some(HDR_PATH.to_owned()),
        default_camera: None,
        allowed_categories: Category::ALL.to_vec(),
        baked: BAKED
            .iter()
            .map(|&(slot, path)| (slot, path.to_owned()))
            .collect::<BTreeMap<_, _>>(),
    };
    let variants = rows(Category::Floor, &FLOOR)
        .chain(rows(Category::Worktop, &WORKTOP))
        .chain(rows(Category::Walls, &WALLS))
        .collect();
    Catalog::new(room, variants)
}
