//! Campaign state and entity variants
//!
//! Everything a playthrough owns lives in `CampaignState`. Entities are plain
//! data plus their own `update`; the resolver and phase machine pick the
//! collections they need by variant.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{field_center, rotate_degrees};

/// Per-instance identity, unique within a playthrough
pub type EntityId = u32;

/// Campaign progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Clearable asteroid wave
    Field1,
    /// Endurance asteroid wave, topped up whenever it runs dry
    Field2,
    /// Boss descending toward its engagement point
    BossIntro,
    /// Boss engaged, shields deployed
    BossFight,
    /// Boss defeated
    Victory,
    /// Ship destroyed
    Defeat,
}

impl Phase {
    /// Terminal phases only accept a restart
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }

    /// Text shown when the phase begins
    pub fn banner(self) -> &'static str {
        match self {
            Phase::Field1 => "PHASE 1 START!!",
            Phase::Field2 => "PHASE 2 START!!",
            Phase::BossIntro | Phase::BossFight => "WARNING FINAL BOSS COMING!!!",
            Phase::Victory => Outcome::Victory.message(),
            Phase::Defeat => Outcome::Defeat.message(),
        }
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Phase::Victory => Some(Outcome::Victory),
            Phase::Defeat => Some(Outcome::Defeat),
            _ => None,
        }
    }
}

/// How a playthrough ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Victory => "Victory!!!!!!!!!",
            Outcome::Defeat => "Game Over",
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Outcome::Victory => Phase::Victory,
            Outcome::Defeat => Phase::Defeat,
        }
    }
}

/// Domain events emitted during a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a bullet
    ShotFired { pos: Vec2 },
    /// An asteroid was shot; `children` is how many fragments it left behind
    AsteroidDestroyed {
        tier: AsteroidTier,
        pos: Vec2,
        children: u8,
    },
    /// Ship lost a life
    ShipHit { lives_left: u32 },
    /// A shield was shot down
    ShieldDestroyed { pos: Vec2 },
    /// The shield formation was deployed
    FormationSpawned { count: usize },
    /// Boss lost a life
    BossDamaged { lives_left: u32 },
    PhaseChanged { from: Phase, to: Phase },
    GameOver { outcome: Outcome },
}

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    pub fn radius(self) -> f32 {
        match self {
            AsteroidTier::Large => ASTEROID_RADIUS_LARGE,
            AsteroidTier::Medium => ASTEROID_RADIUS_MEDIUM,
            AsteroidTier::Small => ASTEROID_RADIUS_SMALL,
        }
    }

    /// Tier of the two fragments left behind, if any
    pub fn split(self) -> Option<AsteroidTier> {
        match self {
            AsteroidTier::Large => Some(AsteroidTier::Medium),
            AsteroidTier::Medium => Some(AsteroidTier::Small),
            AsteroidTier::Small => None,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub body: Body,
    /// Unit heading
    pub direction: Vec2,
    pub lives: u32,
    /// 0 = vulnerable; otherwise ticks elapsed in the current immunity window
    pub invincibility_timer: u32,
    /// Thrust applied this tick: -1 brake, 0 coast, 1 thrust
    pub thrust_sign: i8,
}

impl Ship {
    pub fn new(pos: Vec2, lives: u32) -> Self {
        Self {
            body: Body::new(pos, Vec2::ZERO, SHIP_RADIUS),
            direction: Vec2::new(0.0, -1.0),
            lives,
            invincibility_timer: 0,
            thrust_sign: 0,
        }
    }

    /// Turn by one maneuverability step
    pub fn rotate(&mut self, clockwise: bool) {
        let sign = if clockwise { 1.0 } else { -1.0 };
        self.direction = rotate_degrees(self.direction, SHIP_MANEUVERABILITY * sign).normalize();
    }

    /// Accelerate along (or against, when braking) the heading
    pub fn thrust(&mut self, brake: bool) {
        self.thrust_sign = if brake { -1 } else { 1 };
        self.body.vel += self.direction * SHIP_FORCE * f32::from(self.thrust_sign);
        // Clamp each axis separately, keeping its sign
        if self.body.vel.x.abs() >= SHIP_SPEED_LIMIT {
            self.body.vel.x = SHIP_SPEED_LIMIT.copysign(self.body.vel.x);
        }
        if self.body.vel.y.abs() >= SHIP_SPEED_LIMIT {
            self.body.vel.y = SHIP_SPEED_LIMIT.copysign(self.body.vel.y);
        }
    }

    pub fn update(&mut self, field: Vec2) {
        self.body.advance_wrapping(field);
    }

    /// Bullet leaving the nose of the ship
    pub fn fire(&self, id: EntityId) -> PlayerBullet {
        PlayerBullet {
            id,
            body: Body::new(
                self.body.pos + self.direction * self.body.radius,
                self.direction * PLAYER_BULLET_SPEED,
                PLAYER_BULLET_RADIUS,
            ),
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        self.invincibility_timer == 0 && !self.body.disabled
    }

    pub fn is_disabled(&self) -> bool {
        self.body.disabled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: EntityId,
    pub body: Body,
    pub tier: AsteroidTier,
}

impl Asteroid {
    pub fn update(&mut self, field: Vec2) {
        self.body.advance_wrapping(field);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub id: EntityId,
    pub body: Body,
}

impl PlayerBullet {
    pub fn update(&mut self, field: Vec2) {
        self.body.advance();
        if self.body.is_out_of_bounds(field) {
            self.body.disable();
        }
    }
}

/// Bullet fired straight down by a shield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub id: EntityId,
    pub body: Body,
    /// Shield that fired it (identity only, not ownership)
    pub launcher: EntityId,
}

impl EnemyBullet {
    pub fn update(&mut self, field: Vec2) {
        self.body.advance();
        if self.body.is_out_of_bounds(field) {
            self.body.disable();
        }
    }
}

/// Boss escort patrolling left and right around its spawn point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub id: EntityId,
    pub body: Body,
    /// Patrol centre
    pub origin: Vec2,
}

impl Shield {
    /// Shields left of the formation axis open by moving left, the rest right
    pub fn new(id: EntityId, origin: Vec2) -> Self {
        let heading = if origin.x < BOSS_ENGAGE_X { -1.0 } else { 1.0 };
        Self {
            id,
            body: Body::new(
                origin,
                Vec2::new(SHIELD_PATROL_SPEED * heading, 0.0),
                SHIELD_RADIUS,
            ),
            origin,
        }
    }

    pub fn update(&mut self, field: Vec2) {
        self.body.advance_wrapping(field);
        let offset = self.body.pos.x - self.origin.x;
        if offset.abs() >= SHIELD_PATROL_RANGE {
            self.body.pos.x = self.origin.x + SHIELD_PATROL_RANGE.copysign(offset);
            self.body.vel.x = -self.body.vel.x;
        }
    }

    /// In the firing band
    pub fn can_fire(&self) -> bool {
        self.body.pos.y >= SHIELD_FIRE_Y
    }

    pub fn fire(&self, id: EntityId) -> EnemyBullet {
        let down = Vec2::new(0.0, 1.0);
        EnemyBullet {
            id,
            body: Body::new(
                self.body.pos + down * self.body.radius,
                down * ENEMY_BULLET_SPEED,
                ENEMY_BULLET_RADIUS,
            ),
            launcher: self.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub lives: u32,
    /// Set once the boss reaches its engagement point
    pub engaged: bool,
}

impl Boss {
    pub fn new(lives: u32) -> Self {
        Self {
            body: Body::new(
                Vec2::new(BOSS_SPAWN_X, BOSS_SPAWN_Y),
                Vec2::new(0.0, BOSS_DESCENT_SPEED),
                BOSS_RADIUS,
            ),
            lives,
            engaged: false,
        }
    }

    /// Move one tick. Returns true on the tick the boss engages.
    pub fn update(&mut self, field: Vec2) -> bool {
        self.body.advance_wrapping(field);
        if !self.engaged {
            if self.body.pos.y >= BOSS_ENGAGE_Y {
                self.body.pos = Vec2::new(BOSS_ENGAGE_X, BOSS_ENGAGE_Y);
                self.body.vel = Vec2::new(BOSS_PATROL_SPEED, 0.0);
                self.engaged = true;
                return true;
            }
            return false;
        }
        let offset = self.body.pos.x - BOSS_ENGAGE_X;
        if offset.abs() >= BOSS_PATROL_RANGE {
            self.body.pos.x = BOSS_ENGAGE_X + BOSS_PATROL_RANGE.copysign(offset);
            self.body.vel.x = -self.body.vel.x;
        }
        false
    }

    /// Hits only count while the boss holds its engagement row
    pub fn is_damageable(&self) -> bool {
        self.engaged && self.body.pos.y == BOSS_ENGAGE_Y
    }

    /// Passing over the engagement point during patrol
    pub fn is_over_engagement_point(&self) -> bool {
        self.engaged && (self.body.pos.x - BOSS_ENGAGE_X).abs() < BOSS_PATROL_SPEED * 0.5
    }
}

/// Complete state of one playthrough (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct CampaignState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Startup constants
    pub tuning: Tuning,
    pub phase: Phase,
    /// Simulation tick counter for the current playthrough
    pub time_ticks: u64,
    pub ship: Ship,
    /// Sorted by id
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<PlayerBullet>,
    pub shields: Vec<Shield>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub boss: Option<Boss>,
    pub(crate) rng: Pcg32,
    next_id: EntityId,
}

impl CampaignState {
    /// Create a fresh playthrough starting in Field 1
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self::blank(seed, tuning);
        state.enter_phase(Phase::Field1, &mut Vec::new());
        state
    }

    /// Start directly in a non-terminal phase (terminal phases fall back to Field 1)
    pub fn with_start_phase(seed: u64, tuning: Tuning, phase: Phase) -> Self {
        let phase = if phase.is_terminal() { Phase::Field1 } else { phase };
        let mut state = Self::blank(seed, tuning);
        state.enter_phase(phase, &mut Vec::new());
        state
    }

    fn blank(seed: u64, tuning: Tuning) -> Self {
        let center = field_center(tuning.field_size());
        let lives = tuning.ship_lives;
        Self {
            seed,
            tuning,
            phase: Phase::Field1,
            time_ticks: 0,
            ship: Ship::new(center, lives),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            shields: Vec::new(),
            enemy_bullets: Vec::new(),
            boss: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Tear down the playthrough and start again from Field 1.
    ///
    /// The RNG keeps running, so consecutive playthroughs differ while the
    /// whole session stays reproducible from the seed.
    pub fn restart(&mut self) {
        log::info!("Restarting campaign (seed {})", self.seed);
        let center = field_center(self.tuning.field_size());
        self.ship = Ship::new(center, self.tuning.ship_lives);
        self.asteroids.clear();
        self.bullets.clear();
        self.shields.clear();
        self.enemy_bullets.clear();
        self.boss = None;
        self.time_ticks = 0;
        self.enter_phase(Phase::Field1, &mut Vec::new());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn field_size(&self) -> Vec2 {
        self.tuning.field_size()
    }

    pub fn field_center(&self) -> Vec2 {
        field_center(self.tuning.field_size())
    }

    /// One axis of a fresh asteroid velocity
    pub(crate) fn random_speed(&mut self) -> f32 {
        ASTEROID_SPEEDS[self.rng.random_range(0..ASTEROID_SPEEDS.len())]
    }

    pub(crate) fn random_velocity(&mut self) -> Vec2 {
        let x = self.random_speed();
        let y = self.random_speed();
        Vec2::new(x, y)
    }

    /// Pick a field position clear of the ship.
    ///
    /// Rejection sampled; if the budget runs out the farthest candidate wins
    /// so a cramped custom field cannot stall the tick.
    fn random_clear_position(&mut self) -> Vec2 {
        let field = self.field_size();
        let ship_pos = self.ship.body.pos;
        let min_dist = self.ship.body.radius * self.tuning.min_spawn_distance;
        let width = (field.x as u32).max(1);
        let height = (field.y as u32).max(1);

        let mut best = Vec2::ZERO;
        let mut best_dist = f32::NEG_INFINITY;
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = Vec2::new(
                self.rng.random_range(0..width) as f32,
                self.rng.random_range(0..height) as f32,
            );
            let dist = candidate.distance(ship_pos);
            if dist >= min_dist {
                return candidate;
            }
            if dist > best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        log::warn!(
            "No asteroid spawn point {:.0} away from the ship; using {:?}",
            min_dist,
            best
        );
        best
    }

    /// Spawn a fresh Large asteroid away from the ship
    pub fn spawn_field_asteroid(&mut self) {
        let pos = self.random_clear_position();
        let vel = self.random_velocity();
        let id = self.next_entity_id();
        log::debug!("Spawned asteroid {} at {:?}", id, pos);
        self.asteroids.push(Asteroid {
            id,
            body: Body::new(pos, vel, AsteroidTier::Large.radius()),
            tier: AsteroidTier::Large,
        });
    }

    /// Refill an empty endurance wave
    pub fn top_up_field(&mut self) {
        let count = self.tuning.field2_top_up.max(1);
        log::debug!("Field 2 topped up with {} asteroids", count);
        for _ in 0..count {
            self.spawn_field_asteroid();
        }
    }

    /// Fragment spawned at its parent's position, skipping the clearance check
    pub(crate) fn make_fragment(&mut self, tier: AsteroidTier, pos: Vec2) -> Asteroid {
        let vel = self.random_velocity();
        Asteroid {
            id: self.next_entity_id(),
            body: Body::new(pos, vel, tier.radius()),
            tier,
        }
    }

    /// Deploy the 14-shield formation around the engagement point
    pub fn spawn_formation(&mut self, events: &mut Vec<GameEvent>) {
        for &(x, y) in &SHIELD_FORMATION {
            let id = self.next_entity_id();
            self.shields.push(Shield::new(id, Vec2::new(x, y)));
        }
        log::debug!("Shield formation deployed ({} shields)", SHIELD_FORMATION.len());
        events.push(GameEvent::FormationSpawned {
            count: SHIELD_FORMATION.len(),
        });
    }

    /// Switch phase and run its entry actions
    pub fn enter_phase(&mut self, next: Phase, events: &mut Vec<GameEvent>) {
        let from = self.phase;
        self.phase = next;
        match next {
            Phase::Field1 => {
                self.asteroids.clear();
                for _ in 0..self.tuning.field1_asteroids {
                    self.spawn_field_asteroid();
                }
            }
            Phase::Field2 => {
                if self.asteroids.is_empty() {
                    self.top_up_field();
                }
            }
            Phase::BossIntro => {
                self.asteroids.clear();
                self.shields.clear();
                self.enemy_bullets.clear();
                self.boss = Some(Boss::new(self.tuning.boss_lives));
            }
            Phase::BossFight => {
                if self.boss.is_none() {
                    let mut boss = Boss::new(self.tuning.boss_lives);
                    boss.body.pos = Vec2::new(BOSS_ENGAGE_X, BOSS_ENGAGE_Y);
                    boss.body.vel = Vec2::new(BOSS_PATROL_SPEED, 0.0);
                    boss.engaged = true;
                    self.asteroids.clear();
                    self.boss = Some(boss);
                }
                if self.shields.is_empty() {
                    self.spawn_formation(events);
                }
            }
            Phase::Victory | Phase::Defeat => {}
        }

        if from != next {
            log::info!("Phase {:?} -> {:?}: {}", from, next, next.banner());
            events.push(GameEvent::PhaseChanged { from, to: next });
        }
        if let Some(outcome) = next.outcome() {
            events.push(GameEvent::GameOver { outcome });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_campaign_seeds_field1() {
        let state = CampaignState::new(7);
        assert_eq!(state.phase, Phase::Field1);
        assert_eq!(state.asteroids.len(), FIELD1_ASTEROIDS);
        assert!(state.asteroids.iter().all(|a| a.tier == AsteroidTier::Large));
        assert_eq!(state.ship.lives, SHIP_LIVES);
        assert_eq!(state.ship.body.pos, Vec2::new(512.0, 384.0));
    }

    #[test]
    fn test_field_asteroids_keep_clear_of_ship() {
        let state = CampaignState::new(42);
        let min_dist = SHIP_RADIUS * MIN_DISTANCE;
        for asteroid in &state.asteroids {
            assert!(asteroid.body.pos.distance(state.ship.body.pos) >= min_dist);
        }
    }

    #[test]
    fn test_asteroid_speeds_come_from_table() {
        let mut state = CampaignState::new(3);
        for _ in 0..200 {
            let v = state.random_velocity();
            assert!(ASTEROID_SPEEDS.contains(&v.x));
            assert!(ASTEROID_SPEEDS.contains(&v.y));
        }
    }

    #[test]
    fn test_half_speed_drawn_twice_as_often() {
        let mut state = CampaignState::new(11);
        let samples = 16_000;
        let mut half = 0;
        let mut two = 0;
        for _ in 0..samples {
            let s = state.random_speed();
            if s == 0.5 {
                half += 1;
            } else if s == 2.0 {
                two += 1;
            }
        }
        // Expected 4000 vs 2000
        assert!(half > 3500 && half < 4500, "0.5 drawn {half} times");
        assert!(two > 1600 && two < 2400, "2.0 drawn {two} times");
    }

    #[test]
    fn test_ship_speed_clamped_per_axis() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0), 3);
        for _ in 0..100 {
            ship.thrust(false);
        }
        assert_eq!(ship.body.vel.y, -SHIP_SPEED_LIMIT);
        assert_eq!(ship.thrust_sign, 1);
        for _ in 0..200 {
            ship.thrust(true);
        }
        assert_eq!(ship.body.vel.y, SHIP_SPEED_LIMIT);
        assert_eq!(ship.thrust_sign, -1);
    }

    #[test]
    fn test_ship_rotation_keeps_unit_heading() {
        let mut ship = Ship::new(Vec2::ZERO, 1);
        for _ in 0..30 {
            ship.rotate(true);
        }
        // 30 steps of 3 degrees = quarter turn clockwise
        assert!((ship.direction.length() - 1.0).abs() < 1e-4);
        assert!((ship.direction.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_ship_fires_from_nose() {
        let ship = Ship::new(Vec2::new(200.0, 200.0), 1);
        let bullet = ship.fire(9);
        assert_eq!(bullet.body.pos, Vec2::new(200.0, 200.0 - SHIP_RADIUS));
        assert_eq!(bullet.body.vel, Vec2::new(0.0, -PLAYER_BULLET_SPEED));
    }

    #[test]
    fn test_shield_patrol_reverses_at_range() {
        let mut shield = Shield::new(1, Vec2::new(692.0, 200.0));
        let field = Vec2::new(1024.0, 768.0);
        let mut max_x: f32 = 0.0;
        let mut min_x: f32 = f32::MAX;
        for _ in 0..2000 {
            shield.update(field);
            max_x = max_x.max(shield.body.pos.x);
            min_x = min_x.min(shield.body.pos.x);
            assert!((shield.body.pos.x - shield.origin.x).abs() <= SHIELD_PATROL_RANGE);
            assert_eq!(shield.body.pos.y, 200.0);
        }
        assert_eq!(max_x, 692.0 + SHIELD_PATROL_RANGE);
        assert_eq!(min_x, 692.0 - SHIELD_PATROL_RANGE);
    }

    #[test]
    fn test_boss_descends_then_engages() {
        let mut boss = Boss::new(BOSS_LIVES);
        let field = Vec2::new(1024.0, 768.0);
        let mut ticks = 0;
        while !boss.update(field) {
            ticks += 1;
            assert!(!boss.is_damageable());
            assert!(ticks < 10_000);
        }
        assert!(boss.engaged);
        assert!(boss.is_damageable());
        assert_eq!(boss.body.pos, Vec2::new(BOSS_ENGAGE_X, BOSS_ENGAGE_Y));
        assert_eq!(boss.body.vel, Vec2::new(BOSS_PATROL_SPEED, 0.0));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = CampaignState::new(5);
        state.ship.lives = 1;
        state.asteroids.clear();
        state.enter_phase(Phase::BossIntro, &mut Vec::new());
        assert!(state.boss.is_some());

        state.restart();
        assert_eq!(state.phase, Phase::Field1);
        assert_eq!(state.ship.lives, SHIP_LIVES);
        assert_eq!(state.asteroids.len(), FIELD1_ASTEROIDS);
        assert!(state.boss.is_none());
        assert!(state.shields.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_start_in_boss_fight_deploys_formation() {
        let state = CampaignState::with_start_phase(1, Tuning::default(), Phase::BossFight);
        assert_eq!(state.shields.len(), 14);
        assert!(state.boss.as_ref().is_some_and(|b| b.engaged));
        assert!(state.asteroids.is_empty());
    }

    #[test]
    fn test_start_in_field2_has_asteroids() {
        let state = CampaignState::with_start_phase(1, Tuning::default(), Phase::Field2);
        assert_eq!(state.phase, Phase::Field2);
        assert_eq!(state.asteroids.len(), FIELD2_TOP_UP);
        assert!(state.asteroids.iter().all(|a| a.tier == AsteroidTier::Large));
    }

    #[test]
    fn test_boss_phases_share_warning_banner() {
        assert_eq!(Phase::BossFight.banner(), Phase::BossIntro.banner());
    }
}
