//! Suspense choreography for one selection run.
//!
//! A [`Choreography`] owns the ephemeral frame state of every item on the
//! animation area and advances it each time it is ticked with the current
//! time. It knows nothing about rendering or scheduling: the caller decides
//! how often to tick (display refresh or a fixed interval) and what to draw.
//!
//! Two styles are available:
//!
//! * [`AnimationStyle::Physics`] runs a three-phase motion simulation:
//!   - **Chaos** (0–40%): jittered velocities, clamped, bouncing off the walls
//!   - **Spotlight** (40–80%): the winner and possibly one decoy take turns
//!     being highlighted while everyone else coasts to a stop
//!   - **Finale** (80–100%): the winner glides to the center and pulses while
//!     the rest fade out
//! * [`AnimationStyle::Cycling`] teleports every item to a random spot on a
//!   fixed cadence and flashes the winner near the end.
//!
//! Both finish with the same deterministic placement: winner centered and
//! highlighted, everyone else dimmed.

use crate::defaults;
use crate::easing::{self, approach, ease_in_out_cubic, ease_in_out_quad, ease_out_cubic};
use crate::{ParticipantId, PickerError};
use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::f64::consts::PI;

// Fraction of velocity applied to position per frame
const CHAOS_STEP: f64 = 0.1;
const DRIFT_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationStyle {
    #[default]
    Physics,
    Cycling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Chaos,
    Spotlight,
    Finale,
    Settled,
}

impl Phase {
    /// Phase for a linear progress fraction.
    pub fn at(progress: f64) -> Self {
        if progress >= 1.0 {
            Phase::Settled
        } else if progress >= defaults::SPOTLIGHT_END {
            Phase::Finale
        } else if progress >= defaults::CHAOS_END {
            Phase::Spotlight
        } else {
            Phase::Chaos
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Running,
    Settled,
}

/// Size of the animation surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub width: f64,
    pub height: f64,
}

impl Area {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest left offset that keeps an item fully inside.
    pub fn max_x(&self) -> f64 {
        (self.width - defaults::ITEM_WIDTH).max(0.0)
    }

    pub fn max_y(&self) -> f64 {
        (self.height - defaults::ITEM_HEIGHT).max(0.0)
    }

    /// Top-left offset that centers an item.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.width / 2.0 - defaults::ITEM_WIDTH / 2.0).clamp(0.0, self.max_x()),
            (self.height / 2.0 - defaults::ITEM_HEIGHT / 2.0).clamp(0.0, self.max_y()),
        )
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.max_x()).contains(&x) && (0.0..=self.max_y()).contains(&y)
    }

    fn clamp(&self, item: &mut ItemState) {
        item.x = item.x.clamp(0.0, self.max_x());
        item.y = item.y.clamp(0.0, self.max_y());
    }
}

impl Default for Area {
    fn default() -> Self {
        Self::new(defaults::AREA_WIDTH, defaults::AREA_HEIGHT)
    }
}

/// Frame state of one participant's card.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemState {
    pub id: ParticipantId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub highlighted: bool,
    pub opacity: f64,
    pub scale: f64,
}

impl ItemState {
    fn at(id: ParticipantId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            highlighted: false,
            opacity: 1.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    pub style: AnimationStyle,
    pub area: Area,
    /// Total animated time before the final placement.
    pub duration_ms: f64,
    /// Pause between the final placement and the reveal.
    pub reveal_delay_ms: f64,
    /// Spotlight cadence (physics only).
    pub candidate_switch_ms: f64,
    /// Chance of adding a decoy candidate (physics only, needs N > 2).
    pub decoy_chance: f64,
    /// Number of jumps (cycling only).
    pub iterations: u32,
}

impl AnimationConfig {
    pub fn physics() -> Self {
        Self {
            style: AnimationStyle::Physics,
            area: Area::default(),
            duration_ms: defaults::PHYSICS_DURATION_MS,
            reveal_delay_ms: defaults::PHYSICS_REVEAL_DELAY_MS,
            candidate_switch_ms: defaults::CANDIDATE_SWITCH_MS,
            decoy_chance: defaults::DECOY_CHANCE,
            iterations: defaults::CYCLING_ITERATIONS,
        }
    }

    pub fn cycling() -> Self {
        Self {
            style: AnimationStyle::Cycling,
            duration_ms: defaults::CYCLING_DURATION_MS,
            reveal_delay_ms: defaults::CYCLING_REVEAL_DELAY_MS,
            ..Self::physics()
        }
    }

    pub fn for_style(style: AnimationStyle) -> Self {
        match style {
            AnimationStyle::Physics => Self::physics(),
            AnimationStyle::Cycling => Self::cycling(),
        }
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = area;
        self
    }

    /// Time between jumps in the cycling style.
    pub fn step_ms(&self) -> f64 {
        self.duration_ms / self.iterations.max(1) as f64
    }

    pub fn validate(&self) -> Result<(), PickerError> {
        let times = [
            ("duration", self.duration_ms),
            ("reveal delay", self.reveal_delay_ms),
            ("candidate switch", self.candidate_switch_ms),
        ];
        for (name, value) in times {
            if !value.is_finite() || value < 0.0 {
                return Err(PickerError::InvalidAnimation(format!(
                    "{} must be a non-negative number of ms, got {}",
                    name, value
                )));
            }
        }
        if !self.area.width.is_finite() || !self.area.height.is_finite() {
            return Err(PickerError::InvalidAnimation(format!(
                "area must have a finite size, got {}x{}",
                self.area.width, self.area.height
            )));
        }
        if !(0.0..=1.0).contains(&self.decoy_chance) {
            return Err(PickerError::InvalidAnimation(format!(
                "decoy chance must be within 0..=1, got {}",
                self.decoy_chance
            )));
        }
        if self.iterations == 0 {
            return Err(PickerError::InvalidAnimation(
                "cycling needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::physics()
    }
}

/// Pre-built distributions for one run.
#[derive(Debug, Clone)]
struct Sampler {
    x: Uniform<f64>,
    y: Uniform<f64>,
    launch: Uniform<f64>,
    jitter: Uniform<f64>,
    wobble: Uniform<f64>,
}

impl Sampler {
    fn new(area: &Area) -> Result<Self, PickerError> {
        Ok(Self {
            x: Uniform::new_inclusive(0.0, area.max_x())?,
            y: Uniform::new_inclusive(0.0, area.max_y())?,
            launch: Uniform::new_inclusive(-defaults::INITIAL_VELOCITY, defaults::INITIAL_VELOCITY)?,
            jitter: Uniform::new_inclusive(-defaults::VELOCITY_JITTER, defaults::VELOCITY_JITTER)?,
            wobble: Uniform::new_inclusive(-defaults::SPOTLIGHT_WOBBLE, defaults::SPOTLIGHT_WOBBLE)?,
        })
    }

    fn scatter<R: Rng>(&self, ids: &[ParticipantId], rng: &mut R) -> Vec<ItemState> {
        ids.iter()
            .map(|&id| ItemState::at(id, self.x.sample(rng), self.y.sample(rng)))
            .collect()
    }
}

/// The winner first, then at most one decoy drawn uniformly from everyone else.
pub fn pick_candidates<R: Rng>(
    ids: &[ParticipantId],
    winner: ParticipantId,
    decoy_chance: f64,
    rng: &mut R,
) -> Vec<ParticipantId> {
    let mut candidates = vec![winner];
    if ids.len() > 2 && rng.random_bool(decoy_chance) {
        let others: Vec<ParticipantId> = ids.iter().copied().filter(|&id| id != winner).collect();
        if let Some(&decoy) = others.choose(rng) {
            candidates.push(decoy);
        }
    }
    candidates
}

/// Final deterministic placement shared by both styles.
fn place_final(items: &mut [ItemState], winner: ParticipantId, area: &Area, dim_to: f64) {
    let (cx, cy) = area.center();
    for item in items.iter_mut() {
        if item.id == winner {
            item.x = cx;
            item.y = cy;
            item.highlighted = true;
            item.opacity = 1.0;
            item.scale = defaults::WINNER_SCALE;
        } else {
            item.highlighted = false;
            item.opacity = dim_to;
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsController {
    items: Vec<ItemState>,
    winner: ParticipantId,
    candidates: Vec<ParticipantId>,
    candidate_index: usize,
    last_switch_at: Option<f64>,
    started_at: f64,
    duration_ms: f64,
    switch_ms: f64,
    area: Area,
    sampler: Sampler,
    phase: Phase,
    progress: f64,
}

impl PhysicsController {
    fn new<R: Rng>(
        config: &AnimationConfig,
        ids: &[ParticipantId],
        winner: ParticipantId,
        started_at: f64,
        rng: &mut R,
    ) -> Result<Self, PickerError> {
        let sampler = Sampler::new(&config.area)?;
        let mut items = sampler.scatter(ids, rng);
        for item in items.iter_mut() {
            item.vx = sampler.launch.sample(rng);
            item.vy = sampler.launch.sample(rng);
        }
        let candidates = pick_candidates(ids, winner, config.decoy_chance, rng);
        debug!("Spotlight candidates: {:?}", candidates);

        Ok(Self {
            items,
            winner,
            candidates,
            candidate_index: 0,
            last_switch_at: None,
            started_at,
            duration_ms: config.duration_ms,
            switch_ms: config.candidate_switch_ms,
            area: config.area,
            sampler,
            phase: Phase::Chaos,
            progress: 0.0,
        })
    }

    pub fn candidates(&self) -> &[ParticipantId] {
        &self.candidates
    }

    /// The candidate currently in the spotlight.
    pub fn current_candidate(&self) -> ParticipantId {
        self.candidates[self.candidate_index]
    }

    pub fn tick<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> FrameOutcome {
        if self.phase == Phase::Settled {
            return FrameOutcome::Settled;
        }

        let progress = easing::progress(now_ms - self.started_at, self.duration_ms);
        self.progress = progress;
        let phase = Phase::at(progress);
        if phase != self.phase {
            debug!(
                "Phase {:?} -> {:?} at {:.0}ms",
                self.phase,
                phase,
                now_ms - self.started_at
            );
            self.phase = phase;
        }

        match phase {
            Phase::Chaos => {
                self.chaos_frame(easing::segment(progress, 0.0, defaults::CHAOS_END), rng)
            }
            Phase::Spotlight => {
                self.switch_candidate(now_ms);
                self.spotlight_frame(
                    easing::segment(progress, defaults::CHAOS_END, defaults::SPOTLIGHT_END),
                    rng,
                );
            }
            Phase::Finale => {
                self.candidate_index = 0;
                self.finale_frame(easing::segment(progress, defaults::SPOTLIGHT_END, 1.0));
            }
            Phase::Settled => {
                place_final(&mut self.items, self.winner, &self.area, defaults::FADE_FLOOR);
                return FrameOutcome::Settled;
            }
        }
        FrameOutcome::Running
    }

    fn switch_candidate(&mut self, now_ms: f64) {
        let due = self
            .last_switch_at
            .map_or(true, |at| now_ms - at > self.switch_ms);
        if due {
            self.last_switch_at = Some(now_ms);
            self.candidate_index = (self.candidate_index + 1) % self.candidates.len();
            debug!("Spotlight on {}", self.current_candidate());
        }
    }

    fn chaos_frame<R: Rng>(&mut self, local: f64, rng: &mut R) {
        let base_speed = 200.0 * (1.0 - ease_in_out_quad(local) * 0.3);
        let (max_x, max_y) = (self.area.max_x(), self.area.max_y());
        let limit = defaults::MAX_VELOCITY;

        for item in self.items.iter_mut() {
            item.vx = (item.vx + self.sampler.jitter.sample(rng)).clamp(-limit, limit);
            item.vy = (item.vy + self.sampler.jitter.sample(rng)).clamp(-limit, limit);
            item.x += item.vx * base_speed * CHAOS_STEP;
            item.y += item.vy * base_speed * CHAOS_STEP;

            if item.x < 0.0 || item.x > max_x {
                item.vx *= -defaults::BOUNCE;
            }
            if item.y < 0.0 || item.y > max_y {
                item.vy *= -defaults::BOUNCE;
            }
            item.highlighted = false;
            self.area.clamp(item);
        }
    }

    fn spotlight_frame<R: Rng>(&mut self, local: f64, rng: &mut R) {
        let eased = ease_in_out_cubic(local);
        let base_speed = 140.0 * (1.0 - eased) + 20.0;
        let pull = defaults::SPOTLIGHT_PULL * (1.0 - eased * 0.5);
        let current = self.candidates[self.candidate_index];
        let (cx, cy) = self.area.center();

        for item in self.items.iter_mut() {
            if item.id == current {
                item.highlighted = true;
                let tx = cx + self.sampler.wobble.sample(rng);
                let ty = cy + self.sampler.wobble.sample(rng);
                item.x = approach(item.x, tx, pull);
                item.y = approach(item.y, ty, pull);
            } else {
                item.highlighted = false;
                item.vx *= defaults::DAMPING;
                item.vy *= defaults::DAMPING;
                item.x += item.vx * base_speed * DRIFT_STEP * (1.0 - eased);
                item.y += item.vy * base_speed * DRIFT_STEP * (1.0 - eased);
            }
            self.area.clamp(item);
        }
    }

    fn finale_frame(&mut self, local: f64) {
        let eased = ease_out_cubic(local);
        let pulse = 1.1 + (eased * PI * 6.0).sin() * 0.15;
        let (cx, cy) = self.area.center();

        for item in self.items.iter_mut() {
            if item.id == self.winner {
                item.highlighted = true;
                item.x = approach(item.x, cx, defaults::CENTER_PULL);
                item.y = approach(item.y, cy, defaults::CENTER_PULL);
                item.scale = pulse;
                item.opacity = 1.0;
            } else {
                item.highlighted = false;
                item.opacity = (1.0 - eased * 0.8).max(defaults::FADE_FLOOR);
            }
            self.area.clamp(item);
        }
    }
}

#[derive(Debug, Clone)]
pub struct CyclingController {
    items: Vec<ItemState>,
    winner: ParticipantId,
    started_at: f64,
    step_ms: f64,
    iterations: u32,
    iteration: u32,
    area: Area,
    sampler: Sampler,
    settled: bool,
}

impl CyclingController {
    fn new<R: Rng>(
        config: &AnimationConfig,
        ids: &[ParticipantId],
        winner: ParticipantId,
        started_at: f64,
        rng: &mut R,
    ) -> Result<Self, PickerError> {
        let sampler = Sampler::new(&config.area)?;
        Ok(Self {
            items: sampler.scatter(ids, rng),
            winner,
            started_at,
            step_ms: config.step_ms(),
            iterations: config.iterations,
            iteration: 0,
            area: config.area,
            sampler,
            settled: false,
        })
    }

    fn highlight_threshold(&self) -> f64 {
        self.iterations as f64 * defaults::CYCLING_HIGHLIGHT_FROM
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Runs every jump that is due by `now_ms`, catching up if ticks were late.
    pub fn tick<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> FrameOutcome {
        if self.settled {
            return FrameOutcome::Settled;
        }
        let elapsed = now_ms - self.started_at;
        while self.iteration < self.iterations
            && (self.iteration + 1) as f64 * self.step_ms <= elapsed
        {
            self.step(rng);
        }
        if self.iteration >= self.iterations {
            place_final(
                &mut self.items,
                self.winner,
                &self.area,
                defaults::CYCLING_DIM_OPACITY,
            );
            self.settled = true;
            debug!("Cycling finished after {} jumps", self.iteration);
            return FrameOutcome::Settled;
        }
        FrameOutcome::Running
    }

    fn step<R: Rng>(&mut self, rng: &mut R) {
        for item in self.items.iter_mut() {
            item.x = self.sampler.x.sample(rng);
            item.y = self.sampler.y.sample(rng);
        }
        if self.iteration as f64 > self.highlight_threshold()
            && rng.random_bool(defaults::CYCLING_HIGHLIGHT_CHANCE)
        {
            for item in self.items.iter_mut() {
                item.highlighted = item.id == self.winner;
            }
        }
        self.iteration += 1;
    }

    fn phase(&self) -> Phase {
        if self.settled {
            Phase::Settled
        } else if self.iteration as f64 > self.highlight_threshold() {
            Phase::Spotlight
        } else {
            Phase::Chaos
        }
    }
}

/// One run's animation, in either style.
#[derive(Debug, Clone)]
pub enum Choreography {
    Physics(PhysicsController),
    Cycling(CyclingController),
}

impl Choreography {
    /// Scatter `ids` over the area and prepare the run.
    ///
    /// # Errors
    /// * `UnknownParticipant` if `winner` is not one of `ids`
    /// * `InvalidAnimation` if the configuration or area is unusable
    pub fn new<R: Rng>(
        config: &AnimationConfig,
        ids: &[ParticipantId],
        winner: ParticipantId,
        started_at: f64,
        rng: &mut R,
    ) -> Result<Self, PickerError> {
        config.validate()?;
        if !ids.contains(&winner) {
            return Err(PickerError::UnknownParticipant(winner));
        }
        Ok(match config.style {
            AnimationStyle::Physics => Choreography::Physics(PhysicsController::new(
                config, ids, winner, started_at, rng,
            )?),
            AnimationStyle::Cycling => Choreography::Cycling(CyclingController::new(
                config, ids, winner, started_at, rng,
            )?),
        })
    }

    pub fn tick<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> FrameOutcome {
        match self {
            Choreography::Physics(c) => c.tick(now_ms, rng),
            Choreography::Cycling(c) => c.tick(now_ms, rng),
        }
    }

    pub fn items(&self) -> &[ItemState] {
        match self {
            Choreography::Physics(c) => &c.items,
            Choreography::Cycling(c) => &c.items,
        }
    }

    pub fn winner(&self) -> ParticipantId {
        match self {
            Choreography::Physics(c) => c.winner,
            Choreography::Cycling(c) => c.winner,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Choreography::Physics(c) => c.phase,
            Choreography::Cycling(c) => c.phase(),
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        match self {
            Choreography::Physics(c) => c.progress,
            Choreography::Cycling(c) => c.iteration as f64 / c.iterations as f64,
        }
    }

    /// Spotlight candidates, winner first.
    pub fn candidates(&self) -> &[ParticipantId] {
        match self {
            Choreography::Physics(c) => &c.candidates,
            Choreography::Cycling(c) => std::slice::from_ref(&c.winner),
        }
    }

    pub fn style(&self) -> AnimationStyle {
        match self {
            Choreography::Physics(_) => AnimationStyle::Physics,
            Choreography::Cycling(_) => AnimationStyle::Cycling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME_MS: f64 = 16.0;

    fn ids(n: u64) -> Vec<ParticipantId> {
        (1..=n).collect()
    }

    fn physics(decoy_chance: f64) -> AnimationConfig {
        AnimationConfig {
            decoy_chance,
            ..AnimationConfig::physics()
        }
    }

    fn item(c: &Choreography, id: ParticipantId) -> &ItemState {
        c.items().iter().find(|i| i.id == id).unwrap()
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(Phase::at(0.0), Phase::Chaos);
        assert_eq!(Phase::at(0.39), Phase::Chaos);
        assert_eq!(Phase::at(0.4), Phase::Spotlight);
        assert_eq!(Phase::at(0.79), Phase::Spotlight);
        assert_eq!(Phase::at(0.8), Phase::Finale);
        assert_eq!(Phase::at(0.999), Phase::Finale);
        assert_eq!(Phase::at(1.0), Phase::Settled);
    }

    #[test]
    fn decoy_is_never_the_winner() {
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let all = ids(5);
            let winner = all[(seed % 5) as usize];
            let candidates = pick_candidates(&all, winner, 1.0, &mut rng);
            assert_eq!(candidates.len(), 2);
            assert_eq!(candidates[0], winner);
            assert_ne!(candidates[1], winner);
        }
    }

    #[test]
    fn no_decoy_for_two_or_fewer() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_candidates(&ids(2), 1, 1.0, &mut rng), vec![1]);
        assert_eq!(pick_candidates(&ids(5), 4, 0.0, &mut rng), vec![4]);
    }

    #[test]
    fn rejects_winner_outside_items() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = Choreography::new(&AnimationConfig::physics(), &ids(3), 7, 0.0, &mut rng)
            .unwrap_err();
        assert_eq!(err, PickerError::UnknownParticipant(7));
    }

    #[test]
    fn rejects_unusable_config() {
        let mut rng = StdRng::seed_from_u64(3);
        let bad_area = AnimationConfig::physics().with_area(Area::new(f64::NAN, 400.0));
        assert!(matches!(
            Choreography::new(&bad_area, &ids(3), 1, 0.0, &mut rng),
            Err(PickerError::InvalidAnimation(_))
        ));
        let bad_chance = physics(1.5);
        assert!(matches!(
            Choreography::new(&bad_chance, &ids(3), 1, 0.0, &mut rng),
            Err(PickerError::InvalidAnimation(_))
        ));
    }

    #[test]
    fn items_stay_inside_the_area() {
        let mut rng = StdRng::seed_from_u64(11);
        let area = Area::new(600.0, 400.0);
        let config = AnimationConfig::physics().with_area(area);
        let mut c = Choreography::new(&config, &ids(12), 5, 0.0, &mut rng).unwrap();
        let mut now = 0.0;
        while c.tick(now, &mut rng) == FrameOutcome::Running {
            for i in c.items() {
                assert!(area.contains(i.x, i.y), "item {} at ({}, {})", i.id, i.x, i.y);
                assert!(i.vx.abs() <= defaults::MAX_VELOCITY);
                assert!(i.vy.abs() <= defaults::MAX_VELOCITY);
            }
            now += FRAME_MS;
        }
    }

    #[test]
    fn tiny_area_pins_items_to_origin() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = AnimationConfig::physics().with_area(Area::new(100.0, 50.0));
        let mut c = Choreography::new(&config, &ids(3), 2, 0.0, &mut rng).unwrap();
        c.tick(100.0, &mut rng);
        for i in c.items() {
            assert_eq!((i.x, i.y), (0.0, 0.0));
        }
    }

    #[test]
    fn phases_follow_the_clock() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut c = Choreography::new(&physics(0.0), &ids(4), 3, 1_000.0, &mut rng).unwrap();
        c.tick(1_000.0 + 1_950.0, &mut rng);
        assert_eq!(c.phase(), Phase::Chaos);
        c.tick(1_000.0 + 2_000.0, &mut rng);
        assert_eq!(c.phase(), Phase::Spotlight);
        assert!(item(&c, 3).highlighted);
        c.tick(1_000.0 + 4_000.0, &mut rng);
        assert_eq!(c.phase(), Phase::Finale);
        assert_eq!(c.tick(1_000.0 + 5_000.0, &mut rng), FrameOutcome::Settled);
        assert_eq!(c.phase(), Phase::Settled);
        assert_eq!(c.progress(), 1.0);
    }

    #[test]
    fn spotlight_cycles_through_candidates() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut c = Choreography::new(&physics(1.0), &ids(6), 4, 0.0, &mut rng).unwrap();
        let Choreography::Physics(ref mut p) = c else {
            panic!("expected physics choreography");
        };
        let decoy = p.candidates()[1];
        assert_ne!(decoy, 4);

        // The first spotlight frame switches immediately.
        p.tick(2_000.0, &mut rng);
        assert_eq!(p.current_candidate(), decoy);
        p.tick(2_800.0, &mut rng);
        assert_eq!(p.current_candidate(), decoy);
        p.tick(2_801.0, &mut rng);
        assert_eq!(p.current_candidate(), 4);
        p.tick(3_602.0, &mut rng);
        assert_eq!(p.current_candidate(), decoy);

        // The finale always belongs to the winner.
        p.tick(4_100.0, &mut rng);
        assert_eq!(p.current_candidate(), 4);
    }

    #[test]
    fn non_candidates_decelerate_in_spotlight() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut c = Choreography::new(&physics(0.0), &ids(5), 1, 0.0, &mut rng).unwrap();
        c.tick(2_000.0, &mut rng);
        let before = item(&c, 2).vx.abs();
        for k in 1..=20 {
            c.tick(2_000.0 + k as f64 * FRAME_MS, &mut rng);
        }
        let after = item(&c, 2).vx.abs();
        assert!(after <= before * 0.95f64.powi(20) + 1e-9);
    }

    #[test]
    fn finale_fades_losers_and_centers_winner() {
        let mut rng = StdRng::seed_from_u64(13);
        let area = Area::default();
        let config = physics(0.0).with_area(area);
        let mut c = Choreography::new(&config, &ids(4), 2, 0.0, &mut rng).unwrap();
        let mut now = 4_000.0;
        let mut last_opacity = 1.0;
        while now < 5_000.0 {
            c.tick(now, &mut rng);
            let loser = item(&c, 1);
            assert!(loser.opacity <= last_opacity + 1e-9);
            assert!(loser.opacity >= defaults::FADE_FLOOR);
            last_opacity = loser.opacity;
            now += FRAME_MS;
        }
        let (cx, cy) = area.center();
        let w = item(&c, 2);
        assert!((w.x - cx).abs() < 1.0 && (w.y - cy).abs() < 1.0);
    }

    #[test]
    fn final_placement_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(17);
        let area = Area::new(1000.0, 600.0);
        let mut c = Choreography::new(&physics(0.5).with_area(area), &ids(7), 6, 0.0, &mut rng)
            .unwrap();
        assert_eq!(c.tick(10_000.0, &mut rng), FrameOutcome::Settled);
        let (cx, cy) = area.center();
        for i in c.items() {
            if i.id == 6 {
                assert_eq!((i.x, i.y), (cx, cy));
                assert!(i.highlighted);
                assert_eq!(i.scale, defaults::WINNER_SCALE);
            } else {
                assert!(!i.highlighted);
                assert_eq!(i.opacity, defaults::FADE_FLOOR);
            }
        }
        // Further ticks change nothing.
        let snapshot = c.items().to_vec();
        assert_eq!(c.tick(11_000.0, &mut rng), FrameOutcome::Settled);
        assert_eq!(c.items(), snapshot.as_slice());
    }

    #[test]
    fn cycling_runs_fixed_number_of_jumps() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = AnimationConfig::cycling();
        assert_eq!(config.step_ms(), 40.0);
        let mut c = Choreography::new(&config, &ids(5), 3, 0.0, &mut rng).unwrap();

        assert_eq!(c.tick(39.0, &mut rng), FrameOutcome::Running);
        assert_eq!(c.progress(), 0.0);
        assert_eq!(c.tick(40.0, &mut rng), FrameOutcome::Running);
        assert_eq!(c.progress(), 1.0 / 50.0);

        // A late tick catches up on every missed jump.
        assert_eq!(c.tick(1_000.0, &mut rng), FrameOutcome::Running);
        assert_eq!(c.progress(), 25.0 / 50.0);

        assert_eq!(c.tick(2_000.0, &mut rng), FrameOutcome::Settled);
        assert_eq!(c.phase(), Phase::Settled);
        for i in c.items() {
            if i.id == 3 {
                assert!(i.highlighted);
            } else {
                assert_eq!(i.opacity, defaults::CYCLING_DIM_OPACITY);
            }
        }
    }

    #[test]
    fn cycling_only_ever_highlights_the_winner() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut c =
            Choreography::new(&AnimationConfig::cycling(), &ids(6), 2, 0.0, &mut rng).unwrap();
        let mut now = 0.0;
        while c.tick(now, &mut rng) == FrameOutcome::Running {
            for i in c.items() {
                assert!(!i.highlighted || i.id == 2);
            }
            now += 40.0;
        }
        assert_eq!(c.candidates(), &[2]);
    }
}
