// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Set-then-verify helpers over a [`DetailPane`].
//!
//! The settings application applies a change asynchronously, so every write is followed by a
//! bounded wait for the control to report the written value back.

use std::time::Duration;

use tracing::debug;

use crate::ax::{AxError, Slider};
use crate::nav::{DetailPane, NavigationError};
use crate::settings::HandlerError;
use crate::wait::{wait_every, Deadline};

async fn verify<F>(
    pane: &DetailPane<'_>,
    identifier: &str,
    deadline: Deadline,
    predicate: F,
) -> Result<(), HandlerError>
where
    F: FnMut() -> Result<bool, NavigationError>,
{
    let poll_interval = pane.window().config().poll_interval();
    if wait_every::<_, NavigationError>(deadline, poll_interval, predicate).await? {
        Ok(())
    } else {
        Err(HandlerError::Verification {
            control: identifier.to_owned(),
        })
    }
}

pub async fn set_and_verify_checkbox(
    pane: &DetailPane<'_>,
    identifier: &str,
    value: bool,
    deadline: Deadline,
) -> Result<(), HandlerError> {
    pane.set_checkbox_value(identifier, value)?;
    verify(pane, identifier, deadline, || {
        Ok(pane.checkbox_value(identifier)? == value)
    })
    .await
}

pub async fn set_and_verify_popup(
    pane: &DetailPane<'_>,
    identifier: &str,
    label: &str,
    deadline: Deadline,
) -> Result<(), HandlerError> {
    pane.select_popup_value(identifier, label, deadline).await?;
    verify(pane, identifier, deadline, || {
        Ok(pane.popup_value(identifier)? == label)
    })
    .await
}

pub async fn set_and_verify_radio(
    pane: &DetailPane<'_>,
    identifier: &str,
    label: &str,
    deadline: Deadline,
) -> Result<(), HandlerError> {
    pane.select_radio(identifier, label)?;
    verify(pane, identifier, deadline, || {
        Ok(pane.selected_radio_label(identifier)?.as_deref() == Some(label))
    })
    .await
}

/// Moves the slider one step and waits until the step shows.
///
/// Only one step is ever in flight; a lagging application would otherwise queue several and
/// overshoot.
async fn step(
    slider: &Slider<'_>,
    upward: bool,
    from: f64,
    deadline: Deadline,
    poll_interval: Duration,
) -> Result<bool, AxError> {
    if upward {
        slider.increment()?;
    } else {
        slider.decrement()?;
    }
    wait_every::<_, AxError>(deadline, poll_interval, || Ok(slider.value()? != from)).await
}

/// Steps a slider towards `target` and stops on whichever side of it is closer.
///
/// Sliders only move in fixed increments, so the final value is the reachable value nearest to
/// `target`. A target outside the slider's range is rejected before anything is touched.
pub async fn set_slider_closest_to(
    pane: &DetailPane<'_>,
    identifier: &str,
    target: f64,
    deadline: Deadline,
) -> Result<(), HandlerError> {
    let slider = pane.slider(identifier)?;
    let (min, max) = (slider.min_value()?, slider.max_value()?);
    if !(min..=max).contains(&target) {
        return Err(HandlerError::OutOfRange {
            value: target,
            min,
            max,
        });
    }

    let poll_interval = pane.window().config().poll_interval();
    let mut steps = 0u32;
    loop {
        let current = slider.value()?;
        if current == target {
            debug!(control = identifier, steps, value = current, "slider on target");
            return Ok(());
        }

        let upward = current < target;
        steps += 1;
        if !step(&slider, upward, current, deadline, poll_interval).await? {
            break;
        }

        let next = slider.value()?;
        let crossed = if upward { next >= target } else { next <= target };
        if crossed {
            if (current - target).abs() < (next - target).abs()
                && !step(&slider, !upward, next, deadline, poll_interval).await?
            {
                break;
            }
            debug!(control = identifier, steps, "slider crossed target");
            return Ok(());
        }
    }

    Err(HandlerError::Verification {
        control: identifier.to_owned(),
    })
}
