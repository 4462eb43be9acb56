//! Per-state handlers. Each runs once per tick for the active state and
//! decides whether to stay, move on, or end the run.

use reroll_events::SimTime;

use super::state::{JobSite, Phase, Run, RunState, StopReason};
use super::{Orchestrator, Step};
use crate::config::OperationMode;
use crate::error::RunError;
use crate::executor::{BreakProgress, PickupConfirmation, PickupResult};
use crate::ports::World;
use crate::retry::{RetryBudget, RetryDecision};
use crate::services::Notification;
use crate::trade::{TradeCapture, TradeJudge};

impl<W: World> Orchestrator<W> {
    pub(super) fn step(&mut self, run: &mut Run, now: SimTime) -> Step {
        match run.state() {
            RunState::Idle => Step::Stay,
            RunState::InitialPlacement => self.initial_placement(run, now),
            RunState::WaitingToBreak => self.waiting_to_break(run, now),
            RunState::BreakingBlock => self.breaking_block(run, now),
            RunState::WaitingForDrop => self.waiting_for_drop(run, now),
            RunState::PickingUpItem => self.picking_up_item(run, now),
            RunState::ReplacingBlock => self.replacing_block(run, now),
            RunState::WaitingForTarget => self.waiting_for_target(run, now),
            RunState::OpeningNegotiation => self.opening_negotiation(run, now),
            RunState::CheckingOffers => self.checking_offers(run, now),
        }
    }

    fn initial_placement(&mut self, run: &mut Run, now: SimTime) -> Step {
        let settle_ms = run.config.timings.initial_settle_ms;
        let search = run.config.reach.placement_search;
        let Phase::InitialPlacement {
            tries,
            next_try_at,
            placed,
        } = &mut run.phase
        else {
            return Step::Stay;
        };

        if let Some((pos, placed_at)) = *placed {
            if now.since(placed_at) < settle_ms {
                return Step::Stay;
            }
            if let Some(kind) = self.executor.world().block_at(pos).workstation() {
                tracing::info!("Initial job site {} confirmed at {}", kind, pos);
                run.job_site = Some(JobSite { pos, kind });
                return Step::Go(Phase::WaitingForTarget);
            }
            tracing::warn!("Initial placement at {} did not hold", pos);
            *placed = None;
            return retry_or_stop(tries, next_try_at, now, |n| {
                RunError::timeout(format!("initial job site after {} tries", n), settle_ms)
            });
        }

        if now < *next_try_at {
            return Step::Stay;
        }

        let Some(target) = self.executor.world().target(run.target) else {
            return Step::Stop(StopReason::Failed(RunError::target_lost(
                "target is no longer loaded",
            )));
        };
        let radius = search + tries.failures() as i32;
        let Some(pos) = self.executor.find_placement_near(target.block_pos(), radius) else {
            tracing::warn!("No valid placement within {} blocks of the target", radius);
            return retry_or_stop(tries, next_try_at, now, |n| {
                RunError::rejected(
                    "place",
                    format!("no valid position near the target after {} tries", n),
                )
            });
        };

        match self.executor.place_initial(pos) {
            Ok(pos) => {
                *placed = Some((pos, now));
                Step::Stay
            }
            Err(err) if !err.is_retryable() => Step::Stop(StopReason::Failed(err)),
            Err(err) => {
                tracing::warn!("Initial placement at {} failed: {}", pos, err);
                retry_or_stop(tries, next_try_at, now, |n| {
                    RunError::rejected("place", format!("initial placement failed {} times", n))
                })
            }
        }
    }

    fn waiting_to_break(&mut self, run: &mut Run, now: SimTime) -> Step {
        let general = &run.config.general;
        if run.attempts >= general.max_attempts {
            tracing::warn!("Max attempts reached: {}", run.attempts);
            return Step::Stop(StopReason::MaxAttemptsReached);
        }
        if run.config.safety.pause_if_inventory_full && self.executor.inventory_full() {
            tracing::warn!("Inventory full, pausing before the next break");
            return Step::Stop(StopReason::InventoryFull);
        }
        if now.since(run.last_attempt_at) < general.reroll_delay_ms {
            return Step::Stay;
        }

        let anchored = run
            .job_site
            .filter(|site| self.executor.is_job_site(site.pos));
        let site = match anchored.or_else(|| self.rediscover_job_site(run)) {
            Some(site) => site,
            None => {
                return Step::Stop(StopReason::Failed(RunError::context(
                    "job site is gone and none was found near the target",
                )))
            }
        };

        run.attempts += 1;
        run.last_attempt_at = now;
        tracing::info!(
            "Attempt {}/{}: breaking {} at {}",
            run.attempts,
            run.config.general.max_attempts,
            site.kind,
            site.pos
        );
        Step::Go(Phase::BreakingBlock)
    }

    fn rediscover_job_site(&mut self, run: &mut Run) -> Option<JobSite> {
        let target = self.executor.world().target(run.target)?;
        let reach = &run.config.reach;
        let pos = self.executor.find_job_site_near(
            target.block_pos(),
            reach.job_site_search,
            reach.job_site_search_height,
        )?;
        let kind = self.executor.world().block_at(pos).workstation()?;
        tracing::warn!("Job site re-anchored to {} at {}", kind, pos);
        self.executor.remember(pos, kind);
        let site = JobSite { pos, kind };
        run.job_site = Some(site);
        Some(site)
    }

    fn breaking_block(&mut self, run: &mut Run, now: SimTime) -> Step {
        let Some(site) = run.job_site else {
            return Step::Stop(StopReason::Failed(RunError::context("no job site to break")));
        };

        if !run.action_started {
            run.action_started = true;
            return match self.executor.start_break(site.pos) {
                Ok(()) => Step::Stay,
                Err(err) => Step::Stop(StopReason::Failed(err)),
            };
        }

        match self.executor.continue_break() {
            Ok(BreakProgress::Broken) => {
                if run.config.general.mode == OperationMode::SemiAuto {
                    Step::Stop(StopReason::SemiAutoHandoff)
                } else {
                    Step::Go(Phase::WaitingForDrop)
                }
            }
            Ok(progress) => {
                if progress == BreakProgress::Forced {
                    tracing::warn!("Break at {} forced", site.pos);
                }
                let timeout = run.config.timings.break_timeout_ms;
                if run.elapsed(now) > timeout {
                    self.executor.cancel_break();
                    Step::Stop(StopReason::Failed(RunError::timeout(
                        "workstation break",
                        timeout,
                    )))
                } else {
                    Step::Stay
                }
            }
            Err(err) => Step::Stop(StopReason::Failed(err)),
        }
    }

    fn waiting_for_drop(&mut self, run: &mut Run, now: SimTime) -> Step {
        if run.elapsed(now) < run.config.timings.drop_settle_ms {
            return Step::Stay;
        }
        self.executor.reset_pickup();
        Step::Go(Phase::picking_up())
    }

    fn picking_up_item(&mut self, run: &mut Run, now: SimTime) -> Step {
        let notice_sent = matches!(run.phase, Phase::PickingUpItem { notice_sent: true });
        let timings = &run.config.timings;
        let elapsed = run.elapsed(now);

        match self.executor.try_pickup(now) {
            PickupResult::Success(confirmation) => {
                self.executor.halt_movement();
                if confirmation == PickupConfirmation::AssumedSuccess {
                    tracing::warn!("Pickup not confirmed by inventory, continuing");
                }
                if self.executor.has_workstation() {
                    Step::Go(Phase::replacing_block(&run.config, now))
                } else {
                    Step::Stop(StopReason::Failed(RunError::exhausted(
                        "no workstation in inventory after pickup",
                    )))
                }
            }
            PickupResult::Fatal(err) => {
                self.executor.halt_movement();
                Step::Stop(StopReason::Failed(err))
            }
            PickupResult::InProgress => {
                if !notice_sent && elapsed >= timings.pickup_notice_ms {
                    let sound = run.config.general.sound_notifications;
                    self.notify(sound, Notification::info("Walking to pick up item..."));
                    run.phase = Phase::PickingUpItem { notice_sent: true };
                }
                if elapsed <= run.config.timings.pickup_timeout_ms {
                    return Step::Stay;
                }
                self.executor.halt_movement();
                if self.executor.has_workstation() {
                    tracing::warn!("Could not reach the dropped item, using a spare workstation");
                    Step::Go(Phase::replacing_block(&run.config, now))
                } else {
                    Step::Stop(StopReason::Failed(RunError::exhausted(
                        "out of workstations: could not reach dropped item",
                    )))
                }
            }
        }
    }

    fn replacing_block(&mut self, run: &mut Run, now: SimTime) -> Step {
        let sound = run.config.general.sound_notifications;
        let settle_ms = run.config.timings.place_settle_ms;
        let window_ms = run.config.timings.place_verify_window_ms;
        let verify_retries = run.config.timings.place_verify_retries;
        let Some(site) = run.job_site else {
            return Step::Stop(StopReason::Failed(RunError::context("no job site to replace")));
        };
        let Phase::ReplacingBlock {
            failures,
            verify_failures,
            next_try_at,
            placed,
        } = &mut run.phase
        else {
            return Step::Stay;
        };

        if let Some((pos, placed_at)) = *placed {
            let since = now.since(placed_at);
            if since < settle_ms {
                return Step::Stay;
            }
            if self.executor.is_job_site(pos) {
                tracing::info!("Job site restored at {}", pos);
                return Step::Go(Phase::WaitingForTarget);
            }
            if since < window_ms {
                return Step::Stay;
            }
            *verify_failures += 1;
            if *verify_failures >= verify_retries {
                return Step::Stop(StopReason::Failed(RunError::timeout(
                    "workstation placement",
                    window_ms,
                )));
            }
            tracing::warn!(
                "Placement at {} did not hold, retrying ({}/{})",
                pos,
                verify_failures,
                verify_retries
            );
            let text = format!(
                "Workstation placement did not hold, retrying ({}/{})",
                verify_failures, verify_retries
            );
            *placed = None;
            *next_try_at = now;
            self.notify(sound, Notification::warning(text));
            return Step::Stay;
        }

        if now < *next_try_at {
            return Step::Stay;
        }
        if !self.executor.has_workstation() {
            return Step::Stop(StopReason::Failed(RunError::exhausted(
                "no workstation left to place",
            )));
        }

        match self.executor.place(site.pos) {
            Ok(actual) => {
                if actual != site.pos {
                    run.job_site = Some(JobSite {
                        pos: actual,
                        kind: site.kind,
                    });
                }
                failures.reset();
                *placed = Some((actual, now));
                Step::Stay
            }
            Err(err) if !err.is_retryable() => Step::Stop(StopReason::Failed(err)),
            Err(err) => match failures.record_failure(now) {
                RetryDecision::Retry { not_before } => {
                    tracing::debug!(
                        "Placement failed ({}/{}): {}",
                        failures.failures(),
                        failures.max_failures(),
                        err
                    );
                    *next_try_at = not_before;
                    Step::Stay
                }
                RetryDecision::GiveUp => {
                    tracing::error!(
                        "Placement at {} failed {} times in a row",
                        site.pos,
                        failures.failures()
                    );
                    Step::Stop(StopReason::Failed(RunError::rejected(
                        "place",
                        format!(
                            "permanently blocked after {} consecutive failures",
                            failures.failures()
                        ),
                    )))
                }
            },
        }
    }

    fn waiting_for_target(&mut self, run: &mut Run, now: SimTime) -> Step {
        let timings = &run.config.timings;
        let elapsed = run.elapsed(now);
        if elapsed < timings.claim_settle_ms {
            return Step::Stay;
        }

        let claimed = self
            .executor
            .world()
            .target(run.target)
            .is_some_and(|target| target.has_role);
        if claimed {
            tracing::info!("Target claimed the job site after {}ms", elapsed);
            return Step::Go(Phase::OpeningNegotiation);
        }
        if elapsed > timings.claim_timeout_ms {
            return Step::Stop(StopReason::Failed(RunError::timeout(
                "target claim",
                timings.claim_timeout_ms,
            )));
        }
        Step::Stay
    }

    fn opening_negotiation(&mut self, run: &mut Run, now: SimTime) -> Step {
        let claimed = self
            .executor
            .world()
            .target(run.target)
            .is_some_and(|target| target.has_role);
        if !claimed {
            run.claim_losses += 1;
            let max = run.config.safety.max_claim_losses;
            if run.claim_losses > max {
                return Step::Stop(StopReason::Failed(RunError::rejected(
                    "claim",
                    format!("target lost its job site claim {} times", run.claim_losses),
                )));
            }
            tracing::warn!(
                "Target lost its claim before negotiation ({}/{})",
                run.claim_losses,
                max
            );
            self.notify(
                run.config.general.sound_notifications,
                Notification::warning("Target lost its job site, waiting for it to reclaim"),
            );
            return Step::Go(Phase::WaitingForTarget);
        }

        if self.executor.world().open_view() == Some(run.target) {
            return Step::Go(Phase::checking_offers());
        }

        match self
            .executor
            .open_negotiation(run.target, run.config.reach.interaction)
        {
            Ok(true) => {
                tracing::info!("Negotiation view opened");
                Step::Go(Phase::checking_offers())
            }
            Ok(false) => {
                let timeout = run.config.timings.open_timeout_ms;
                if run.elapsed(now) > timeout {
                    Step::Stop(StopReason::Failed(RunError::timeout(
                        "negotiation view",
                        timeout,
                    )))
                } else {
                    Step::Stay
                }
            }
            Err(err) => Step::Stop(StopReason::Failed(err)),
        }
    }

    fn checking_offers(&mut self, run: &mut Run, now: SimTime) -> Step {
        let timings = &run.config.timings;
        let elapsed = run.elapsed(now);

        if let Phase::CheckingOffers {
            captured_at: Some(at),
        } = run.phase
        {
            if now.since(at) < timings.close_delay_ms {
                return Step::Stay;
            }
            self.executor.close_view();
            return Step::Go(Phase::WaitingToBreak);
        }

        if elapsed < timings.view_populate_wait_ms {
            return Step::Stay;
        }
        if self.executor.world().open_view() != Some(run.target) {
            if elapsed <= timings.view_reopen_ms {
                return Step::Stay;
            }
            let reopen_ms = timings.view_reopen_ms;
            let max = run.config.safety.max_view_reopens;
            run.view_reopens += 1;
            if run.view_reopens > max {
                return Step::Stop(StopReason::Failed(RunError::timeout(
                    "negotiation view",
                    reopen_ms,
                )));
            }
            tracing::warn!(
                "Negotiation view closed before offers were read, reopening ({}/{})",
                run.view_reopens,
                max
            );
            return Step::Go(Phase::OpeningNegotiation);
        }

        let offers = TradeCapture::capture(self.executor.world());
        if offers.is_empty() {
            if elapsed <= timings.offers_timeout_ms {
                return Step::Stay;
            }
            let timeout = timings.offers_timeout_ms;
            let max = run.config.safety.max_empty_views;
            self.executor.close_view();
            run.empty_views += 1;
            if run.empty_views > max {
                return Step::Stop(StopReason::Failed(RunError::timeout("trade offers", timeout)));
            }
            tracing::warn!(
                "No offers listed after {}ms, waiting for the target again ({}/{})",
                elapsed,
                run.empty_views,
                max
            );
            return Step::Go(Phase::WaitingForTarget);
        }

        tracing::info!("Captured {} offers", offers.len());
        for score in run.evaluator.rank(&offers) {
            tracing::info!("  slot {}: {}", score.slot, score);
        }

        let matched = TradeJudge::filter(&offers, &run.criteria);
        if let Some(offer) = matched.first() {
            tracing::info!("Offer in slot {} matches: {}", offer.slot, offer);
            run.matched = Some((*offer).clone());
            self.executor.lock_destructive();
            return Step::Stop(StopReason::Matched);
        }

        run.phase = Phase::CheckingOffers {
            captured_at: Some(now),
        };
        Step::Stay
    }
}

/// Counts one failed try against `budget`, scheduling the next one or ending
/// the run once the budget is spent.
fn retry_or_stop(
    budget: &mut RetryBudget,
    next_try_at: &mut SimTime,
    now: SimTime,
    give_up: impl FnOnce(u32) -> RunError,
) -> Step {
    match budget.record_failure(now) {
        RetryDecision::Retry { not_before } => {
            *next_try_at = not_before;
            Step::Stay
        }
        RetryDecision::GiveUp => Step::Stop(StopReason::Failed(give_up(budget.failures()))),
    }
}
