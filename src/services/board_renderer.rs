//! ASCII rendering of the fixed strategy layouts for the run log.
//!
//! Layouts mirror the ones hardcoded in the game's simulation scene. Purely
//! presentational; nothing here feeds a decision.

pub const MAP_WIDTH: u8 = 10;
pub const MAP_HEIGHT: u8 = 10;

/// Enemy spawn tiles.
pub const SPAWNS: &[(u8, u8)] = &[(2, 0), (7, 0)];

/// Tiles covered by the shrine.
pub const SHRINE_ZONE: &[(u8, u8)] = &[(4, 4), (5, 4), (4, 5), (5, 5)];

const LEGEND: &str = "Legend: S=Spawn T=Tower #=Wall X=Shrine .=Empty";

/// Static tower and wall placement for one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyLayout {
    pub id: &'static str,
    pub name: &'static str,
    pub towers: &'static [(u8, u8)],
    pub walls: &'static [(u8, u8)],
}

pub const STRATEGIES: &[StrategyLayout] = &[
    StrategyLayout {
        id: "a",
        name: "DualTower",
        towers: &[(3, 2), (6, 2)],
        walls: &[],
    },
    StrategyLayout {
        id: "b",
        name: "TripleTower",
        towers: &[(3, 3), (4, 2), (6, 3)],
        walls: &[],
    },
    StrategyLayout {
        id: "c",
        name: "Flanking",
        towers: &[(1, 2), (8, 2)],
        walls: &[],
    },
    StrategyLayout {
        id: "d",
        name: "CentralDefense",
        towers: &[(3, 4), (6, 4)],
        walls: &[],
    },
];

pub fn layout(id: &str) -> Option<&'static StrategyLayout> {
    STRATEGIES.iter().find(|layout| layout.id == id)
}

fn tile(layout: Option<&StrategyLayout>, pos: (u8, u8)) -> char {
    let towers = layout.map_or(&[][..], |l| l.towers);
    let walls = layout.map_or(&[][..], |l| l.walls);

    if towers.contains(&pos) {
        'T'
    } else if walls.contains(&pos) {
        '#'
    } else if SPAWNS.contains(&pos) {
        'S'
    } else if SHRINE_ZONE.contains(&pos) {
        'X'
    } else {
        '.'
    }
}

/// Render the board for `strategy_id`. Unknown identifiers render an empty
/// board named `?`.
pub fn render_board(strategy_id: &str) -> String {
    let layout = layout(strategy_id);
    let mut lines = Vec::with_capacity(usize::from(MAP_HEIGHT) + 5);

    lines.push(format!(
        "Strategy {}: {}",
        strategy_id.to_uppercase(),
        layout.map_or("?", |l| l.name)
    ));
    lines.push(format!(
        "  {}",
        (0..MAP_WIDTH)
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    ));
    lines.push(format!("  {}", "-".repeat(usize::from(MAP_WIDTH) * 2 - 1)));

    for y in 0..MAP_HEIGHT {
        let row = (0..MAP_WIDTH)
            .map(|x| tile(layout, (x, y)).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("{y}|{row}"));
    }

    lines.push(String::new());
    lines.push(LEGEND.to_string());
    lines.join("\n")
}
