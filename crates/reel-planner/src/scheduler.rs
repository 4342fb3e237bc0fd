use rand::RngCore;
use reel_types::{Template, TemplateItem};
use tracing::{debug, info};

use crate::PlanContext;
use crate::filter::filter_videos;
use crate::priority::presort;
use crate::restrictions::CounterTable;
use crate::state::RunState;

#[derive(Debug, Clone, Copy)]
enum Block {
    Start,
    Main,
    End,
}

impl Block {
    fn as_str(self) -> &'static str {
        match self {
            Block::Start => "start",
            Block::Main => "main",
            Block::End => "end",
        }
    }
}

struct Run<'r, 'a, R: ?Sized> {
    ctx: &'r PlanContext<'a>,
    template: &'r Template,
    rng: &'r mut R,
    tolerance: i64,
    state: RunState<'a>,
}

pub(crate) fn run<'a, R: RngCore + ?Sized>(
    ctx: &PlanContext<'a>,
    template: &Template,
    rng: &mut R,
    tolerance: i64,
    target: i64,
) -> RunState<'a> {
    let mut run = Run {
        ctx,
        template,
        rng,
        tolerance,
        state: RunState::default(),
    };
    run.build(target);

    info!(
        template_id = %template.template_id,
        target_sec = target,
        placed = run.state.len(),
        total_duration_sec = run.state.duration_sec(),
        "playlist-built"
    );
    run.state
}

impl<'a, R: RngCore + ?Sized> Run<'_, 'a, R> {
    fn build(&mut self, target: i64) {
        let template = self.template;

        let remaining = self.process_block(Block::Start, target, &template.start_items);

        let (reserved, remaining) = reserve_for(remaining, &template.end_items);
        debug!(reserved_sec = reserved, remaining_sec = remaining, "end-block-reserved");

        let remaining = self.process_block(Block::Main, remaining, &template.items);
        self.process_block(Block::End, remaining + reserved, &template.end_items);
    }

    /// Cycles through `items` until the budget is within tolerance or a full
    /// pass places nothing.
    fn process_block(&mut self, block: Block, budget: i64, items: &[TemplateItem]) -> i64 {
        let mut remaining = budget;
        if items.is_empty() {
            return remaining;
        }

        while remaining > self.tolerance {
            let placed_before = self.state.len();
            for item in items {
                remaining = self.process_item(remaining, item);
                if remaining <= self.tolerance {
                    return remaining;
                }
            }
            if self.state.len() == placed_before {
                debug!(block = block.as_str(), remaining_sec = remaining, "block-starved");
                break;
            }
        }
        remaining
    }

    /// Fills one item, never giving it more than the block has left.
    fn process_item(&mut self, remaining: i64, item: &TemplateItem) -> i64 {
        let mut item_budget = i64::from(item.duration_sec);
        let mut rest = remaining - item_budget;
        if rest < 0 {
            item_budget += rest;
            rest = 0;
        }
        rest + self.fill_chunk(item_budget, item)
    }

    /// Returns the unused (or, after a tolerated overshoot, negative) budget.
    fn fill_chunk(&mut self, budget: i64, item: &TemplateItem) -> i64 {
        let ctx = self.ctx;
        let mut rest = budget;
        let mut chunk = CounterTable::default();
        let mut rejected = 0usize;

        for filler in &item.fillers {
            let category_id = filler.category_id.as_str();
            let mut candidates =
                filter_videos(ctx, &self.state, category_id, rest, filler.allow_seen);
            presort(&mut candidates, filler, ctx, &mut *self.rng);

            for video in candidates {
                if i64::from(video.duration_sec) - rest > self.tolerance {
                    continue;
                }
                if !chunk.allows(video, category_id, &item.restrictions)
                    || !self
                        .state
                        .totals()
                        .allows(video, category_id, &self.template.restrictions)
                {
                    rejected += 1;
                    continue;
                }

                chunk.record(video, category_id);
                self.state.place(video, category_id);
                rest -= i64::from(video.duration_sec);

                if rest <= self.tolerance {
                    debug!(item_id = %item.item_id, rest_sec = rest, rejected, "chunk-filled");
                    return rest;
                }
            }
        }

        debug!(item_id = %item.item_id, rest_sec = rest, rejected, "chunk-exhausted");
        rest
    }
}

/// Sets aside the end block's declared time, never more than what is left.
/// Returns `(reserved, remaining)`.
fn reserve_for(mut remaining: i64, items: &[TemplateItem]) -> (i64, i64) {
    let mut reserved = 0;
    for item in items {
        let duration = i64::from(item.duration_sec);
        if duration > remaining {
            let take = remaining.max(0);
            reserved += take;
            remaining -= take;
            break;
        }
        reserved += duration;
        remaining -= duration;
    }
    (reserved, remaining)
}
