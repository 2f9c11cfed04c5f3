// Copyright (c) 2023 VESTA LABS <info@vesta.network>

mod scenarios_mandatories;
mod tests_ingestion;
mod tests_queues;
mod tests_stop_control;
