// Tick timing (milliseconds)
pub const BASE_INTERVAL_MS: u64 = 150;
pub const MIN_INTERVAL_MS: u64 = 50;
pub const INTERVAL_STEP_MS: u64 = 10;
pub const BOOST_INTERVAL_MS: u64 = 75;
pub const BOOST_TICKS: u32 = 20; // 20 x 75ms = 1.5s of turbo
pub const MAX_DT_MS: u64 = 500;

// Scoring
pub const POINTS_PER_LEVEL: i64 = 100;
pub const GHOST_POINTS: i64 = 50;

// Food spawning
pub const MIN_FOODS: usize = 2;
pub const MAX_FOODS: usize = 5;
pub const INITIAL_FOODS_MAX: usize = 4;
pub const FOOD_SPAWN_MIN_MS: u64 = 1500;
pub const FOOD_SPAWN_MAX_MS: u64 = 3000;
pub const FOOD_RESPAWN_AFTER_EAT_MS: u64 = 500;
pub const FOOD_INTRO_MS: u64 = 300;
pub const MAX_SPAWN_ATTEMPTS: u32 = 50;

// Ghost food
pub const GHOST_SPAWN_CHANCE: f64 = 0.25;
pub const GHOST_MOVE_INTERVAL_TICKS: u32 = 5;

// Transient effects (ticks)
pub const POPUP_TICKS: u32 = 8;
pub const POISON_FLASH_TICKS: u32 = 3;

// Viewport sizing
pub const VIEWPORT_COLUMNS: u32 = 40;
pub const VIEWPORT_ROWS: u32 = 30;
pub const MAX_CELL_PX: u16 = 2;
pub const USABLE_WIDTH_FRACTION: f64 = 0.8;
pub const USABLE_HEIGHT_FRACTION: f64 = 0.7;

// Input
pub const SWIPE_THRESHOLD_CELLS: i32 = 3;
pub const SWIPE_DEBOUNCE_MS: u64 = 200;

// Host loop and persistence
pub const FRAME_POLL_MS: u64 = 16;
pub const HISTORY_LEN: usize = 10;
pub const DATA_DIR_NAME: &str = ".neon-snake";
pub const HIGH_SCORE_FILE: &str = "high_score";
pub const HISTORY_FILE: &str = "history.json";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "neon-snake.log";
