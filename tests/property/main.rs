mod channel_fidelity;
